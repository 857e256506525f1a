use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconomicError {
    #[error("HTTP transport failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML processing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Service description error: {message}")]
    ServiceDescriptionError { message: String },

    #[error("No such method in WSDL specification: {operation}")]
    UnknownOperation { operation: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("SOAP fault {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("Unexpected HTTP status {status} from {operation}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {operation}: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("{operation} returned no {field} elements")]
    EmptyResult { operation: String, field: String },
}

pub type Result<T> = std::result::Result<T, EconomicError>;
