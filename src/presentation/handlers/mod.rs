pub mod signup_handler;
