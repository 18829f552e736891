//! Shared ParaBank constants

/// Public ParaBank demo deployment
pub const DEFAULT_BASE_URL: &str = "https://parabank.parasoft.com/parabank";

/// URL substring that identifies the login area of the public demo
pub const LOGIN_AREA_MARKER: &str = "parabank.parasoft.com/parabank";

// Page paths, relative to the base URL
pub const INDEX_PAGE: &str = "index.htm";
pub const LOGIN_PAGE: &str = "login.htm";
pub const OVERVIEW_PAGE: &str = "overview.htm";
pub const TRANSFER_PAGE: &str = "transfer.htm";
pub const BILL_PAY_PAGE: &str = "billpay.htm";
pub const LOGOUT_PAGE: &str = "logout.htm";

/// Message ParaBank shows for a rejected login
pub const LOGIN_ERROR_TEXT: &str = "The username and password could not be verified.";

/// A username/password pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Account that ships with every ParaBank deployment
pub const DEMO_CREDENTIALS: Credentials<'static> = Credentials {
    username: "john",
    password: "demo",
};

/// A pair ParaBank is expected to reject
pub const INVALID_CREDENTIALS: Credentials<'static> = Credentials {
    username: "invalid_user",
    password: "wrong_password",
};
