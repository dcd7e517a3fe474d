pub mod book_queue_route;
