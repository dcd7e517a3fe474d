pub mod add_text_route;
pub mod documents_request;
pub mod documents_response;
pub mod documents_route;
pub mod upload_route;
