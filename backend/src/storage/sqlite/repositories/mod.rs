pub mod category_repository;
pub mod subcategory_repository;
pub mod transaction_repository;

pub use category_repository::CategoryRepository;
pub use subcategory_repository::SubcategoryRepository;
pub use transaction_repository::TransactionRepository;
