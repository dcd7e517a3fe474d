pub mod suggestions_route;
