//! Deferred element references
//!
//! A [`Locator`] is only a description. It is shipped to the driver with
//! every command and resolved against the live page at that moment, so a
//! re-render between two commands never leaves a stale handle behind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One link in a locator chain, applied to the scope produced by the
/// previous link (the page for the first one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// ARIA role with accessible name
    Role { role: String, name: String },

    /// Form control by its label text
    Label { text: String },

    /// Element by its visible text
    Text { text: String },

    /// CSS selector, optionally restricted to matches containing `has`
    Css {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has: Option<Box<Locator>>,
    },

    /// XPath expression relative to the current scope
    Xpath { expr: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    chain: Vec<Selector>,
}

impl Locator {
    fn root(selector: Selector) -> Self {
        Self { chain: vec![selector] }
    }

    pub fn by_role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::root(Selector::Role { role: role.into(), name: name.into() })
    }

    pub fn by_label(text: impl Into<String>) -> Self {
        Self::root(Selector::Label { text: text.into() })
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self::root(Selector::Text { text: text.into() })
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::root(Selector::Css { selector: selector.into(), has: None })
    }

    /// Elements matching `selector` that contain an element matching `has`.
    pub fn css_has(selector: impl Into<String>, has: Locator) -> Self {
        Self::root(Selector::Css {
            selector: selector.into(),
            has: Some(Box::new(has)),
        })
    }

    /// Narrow to descendants matching a CSS selector
    pub fn locator(mut self, selector: impl Into<String>) -> Self {
        self.chain.push(Selector::Css { selector: selector.into(), has: None });
        self
    }

    pub fn xpath(mut self, expr: impl Into<String>) -> Self {
        self.chain.push(Selector::Xpath { expr: expr.into() });
        self
    }

    pub fn chain(&self) -> &[Selector] {
        &self.chain
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Role { role, name } => write!(f, "getByRole({:?}, {{ name: {:?} }})", role, name),
            Selector::Label { text } => write!(f, "getByLabel({:?})", text),
            Selector::Text { text } => write!(f, "getByText({:?})", text),
            Selector::Css { selector, has: None } => write!(f, "locator({:?})", selector),
            Selector::Css { selector, has: Some(has) } => {
                write!(f, "locator({:?}, {{ has: {} }})", selector, has)
            }
            Selector::Xpath { expr } => write!(f, "locator(\"xpath={}\")", expr),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.chain.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chain_serializes_in_order() {
        let loc = Locator::css("input[name=\"email\"]")
            .xpath("ancestor::div[1]")
            .locator(".icon");

        let value = serde_json::to_value(&loc).unwrap();
        assert_eq!(
            value,
            json!({
                "chain": [
                    { "kind": "css", "selector": "input[name=\"email\"]" },
                    { "kind": "xpath", "expr": "ancestor::div[1]" },
                    { "kind": "css", "selector": ".icon" }
                ]
            })
        );
    }

    #[test]
    fn test_has_filter_nests_locator() {
        let loc = Locator::css_has(".grid", Locator::css("[name=\"first_name\"]")).locator(".err");
        let value = serde_json::to_value(&loc).unwrap();
        assert_eq!(value["chain"][0]["has"]["chain"][0]["selector"], "[name=\"first_name\"]");
        assert_eq!(value["chain"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_display_reads_like_playwright() {
        let loc = Locator::by_role("button", "Continue");
        assert_eq!(loc.to_string(), r#"getByRole("button", { name: "Continue" })"#);

        let loc = Locator::by_text("At least 12 characters").locator(".check");
        assert_eq!(loc.to_string(), r#"getByText("At least 12 characters").locator(".check")"#);
    }

    #[test]
    fn test_construction_is_pure() {
        let a = Locator::by_label("Choose a password (required)");
        let b = Locator::by_label("Choose a password (required)");
        assert_eq!(a, b);
    }
}
