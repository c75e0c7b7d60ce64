//! Error types surfaced by the gateway, the cart and the checkout workflow.
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: DNS, TLS, connect/read timeout, reset.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("HTTP {}: {body}", .status.as_u16())]
    Api { status: StatusCode, body: String },

    /// 3xx response; the configured base address is probably wrong.
    #[error("server redirected ({}) to {location}; check the backend URL", .status.as_u16())]
    Redirect { status: StatusCode, location: String },

    /// Body is not JSON of the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Api { status, .. } | GatewayError::Redirect { status, .. } => {
                Some(*status)
            }
            GatewayError::Network(err) => err.status(),
            GatewayError::Parse(_) => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("'{0}' is currently unavailable")]
    Unavailable(String),
    #[error("menu item {0} is not in the cart")]
    NotInCart(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableSelectionError {
    #[error("table {0} does not exist")]
    UnknownTable(i64),
    #[error("table {0} is not available")]
    NotAvailable(String),
    #[error("take-away orders have no table")]
    TakeAway,
}

/// Failure of the multi-step order submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("customer name is required")]
    MissingCustomerName,
    #[error("cart is empty")]
    EmptyCart,
    #[error("a dine-in order needs a table")]
    NoTableSelected,
    #[error("failed to create transaction: {0}")]
    Create(#[source] GatewayError),
    #[error("failed to add '{item}': {source}")]
    AttachItem {
        item: String,
        #[source]
        source: GatewayError,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("login failed: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_carries_status_and_body() {
        let err = GatewayError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn attach_item_error_names_the_item() {
        let err = CheckoutError::AttachItem {
            item: "Es Teh".into(),
            source: GatewayError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "stock empty".into(),
            },
        };
        assert_eq!(err.to_string(), "failed to add 'Es Teh': HTTP 500: stock empty");
    }

    #[test]
    fn redirect_error_is_distinct() {
        let err = GatewayError::Redirect {
            status: StatusCode::MOVED_PERMANENTLY,
            location: "http://pos.example.com/api".into(),
        };
        assert!(err.to_string().contains("301"));
        assert!(err.to_string().contains("check the backend URL"));
    }
}
