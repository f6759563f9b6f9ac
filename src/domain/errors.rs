use thiserror::Error;

/// Failures of the key/value persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage read failed for '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("Storage write failed for '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("Stored value under '{key}' is malformed: {reason}")]
    Decode { key: String, reason: String },
    #[error("Could not serialize value for '{key}': {reason}")]
    Encode { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CartError {
    /// Rejected before touching the cart.
    #[error("Price {price} for '{id}' is out of range")]
    PriceOutOfRange { id: String, price: u64 },
    /// The in-memory change has already been applied; only persistence
    /// failed.
    #[error("Cart changed but could not be persisted: {0}")]
    StorageWrite(#[source] StorageError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Contact,
    Address,
    PaymentMethod,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Contact => "contact",
            Field::Address => "address",
            Field::PaymentMethod => "paymentMethod",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid checkout form: {} field(s) rejected", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Order could not be recorded: {0}")]
    Storage(#[from] StorageError),
    #[error("Order endpoint unreachable: {0}")]
    Transport(String),
    #[error("Order rejected by endpoint: {0}")]
    Rejected(String),
}

/// Everything that can stop a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
