pub mod answer;
pub mod question;
pub mod test_result;
