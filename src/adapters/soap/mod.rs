pub mod envelope;
pub mod gateway;
pub mod response;
pub mod wsdl;
pub mod xml;

pub use gateway::SoapGateway;
pub use wsdl::ServiceDescription;
