pub mod table_io;
pub mod tensor_io;
