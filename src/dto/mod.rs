pub mod test_dto;
