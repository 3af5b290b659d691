pub mod assessment;
pub mod booklet;
pub mod corpus;
pub mod export;
