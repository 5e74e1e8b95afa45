//! Page abstractions, one per screen of the account flow
//!
//! Locator accessors are plain functions returning an [`Element`]; nothing
//! touches the browser until an action or assertion runs.

use async_trait::async_trait;

use crate::error::E2eResult;
use crate::locator::Locator;
use crate::session::{Element, PageHandle};

mod signin;
mod signup;
mod verify_email;

pub use signin::SigninPage;
pub use signup::SignupPage;
pub use verify_email::VerifyEmailPage;

/// Common shape of every page abstraction
pub trait PageObject {
    fn bind(page: PageHandle) -> Self;

    fn page(&self) -> &PageHandle;

    /// Any element showing `text`
    fn error_message(&self, text: &str) -> Element {
        self.page().locate(Locator::by_text(text))
    }
}

/// Pages that can be opened directly by path
#[async_trait]
pub trait Navigable: PageObject + Sync {
    const PATH: &'static str;

    async fn goto(&self) -> E2eResult<()> {
        self.page().goto(Self::PATH).await
    }
}

/// Alert icon rendered inside the input wrapper of the named field
pub(crate) fn field_error_icon(field: &str) -> Locator {
    Locator::css(format!("input[name=\"{}\"]", field))
        .xpath("ancestor::div[contains(@class, \"RyuInputBaseRoot\")]")
        .locator(".RyuIconSvg--alert-octagon")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Selector;

    #[test]
    fn test_field_error_icon_walks_up_to_input_root() {
        let icon = field_error_icon("email");
        let chain = icon.chain();
        assert_eq!(chain.len(), 3);
        assert!(matches!(&chain[0], Selector::Css { selector, .. } if selector == "input[name=\"email\"]"));
        assert!(matches!(&chain[1], Selector::Xpath { expr } if expr.contains("RyuInputBaseRoot")));
    }
}
