//! Classification domain types

pub mod id_factory;
pub mod normal_form;

pub use id_factory::IdFactory;
pub use normal_form::NormalForm;
