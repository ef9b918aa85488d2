pub mod sign_up_usecase;
