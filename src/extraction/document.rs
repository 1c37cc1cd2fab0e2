use scraper::{ElementRef, Html, Selector};

/// Elements whose text never renders on the page.
const HIDDEN_TEXT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A fetched page body together with its parsed markup tree.
pub struct RawDocument {
    html: Html,
}

impl RawDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Raw text of every embedded JSON-LD block, in document order.
    pub fn structured_data_blocks(&self) -> Vec<String> {
        let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    /// Visible text of the `<body>`, falling back to the whole document.
    pub fn body_text(&self) -> String {
        let body = Selector::parse("body")
            .ok()
            .and_then(|selector| self.html.select(&selector).next());

        match body {
            Some(body) => visible_text(body),
            None => visible_text(self.html.root_element()),
        }
    }
}

fn visible_text(root: ElementRef) -> String {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if HIDDEN_TEXT_TAGS.contains(&parent.value().name()) {
                return None;
            }
            Some(&**text)
        })
        .collect()
}
