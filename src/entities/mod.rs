pub mod news;
pub mod yc_company;

pub use news::Entity as News;
pub use yc_company::Entity as YcCompany;
