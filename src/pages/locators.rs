//! Element locators for the ParaBank pages
//!
//! The left panel carries the login form when logged out and the account
//! services menu when logged in; the right panel carries page content.

use crate::browser::Locator;

// === Login (left panel, logged out) ===

pub const LOGIN_FORM: Locator = Locator::css("#loginPanel form[name='login']");
pub const USERNAME_INPUT: Locator = Locator::css("#loginPanel input[name='username']");
pub const PASSWORD_INPUT: Locator = Locator::css("#loginPanel input[name='password']");
pub const LOGIN_BUTTON: Locator = Locator::css("#loginPanel input[type='submit'][value='Log In']");
pub const LOGIN_ERROR: Locator = Locator::css("#rightPanel p.error");

// === Account services (left panel, logged in) ===

pub const TRANSFER_LINK: Locator = Locator::link_text("Transfer Funds");
pub const BILL_PAY_LINK: Locator = Locator::link_text("Bill Pay");
pub const OVERVIEW_LINK: Locator = Locator::link_text("Accounts Overview");
pub const LOGOUT_LINK: Locator = Locator::link_text("Log Out");

// === Section content (right panel) ===

pub const ACCOUNTS_OVERVIEW: Locator = Locator::css("#showOverview");
pub const TRANSFER_FORM: Locator = Locator::css("#showForm");
pub const BILL_PAY_FORM: Locator = Locator::css("#billpayForm");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Using;

    #[test]
    fn test_section_landmarks_match_parabank_ids() {
        assert_eq!(ACCOUNTS_OVERVIEW.value, "#showOverview");
        assert_eq!(TRANSFER_FORM.value, "#showForm");
        assert_eq!(BILL_PAY_FORM.value, "#billpayForm");
    }

    #[test]
    fn test_menu_links_use_visible_text() {
        for link in [TRANSFER_LINK, BILL_PAY_LINK, OVERVIEW_LINK, LOGOUT_LINK] {
            assert_eq!(link.using, Using::LinkText);
        }
        assert_eq!(LOGOUT_LINK.value, "Log Out");
    }
}
