mod category_dto;
mod category_tree;

pub use category_dto::{CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto};
pub use category_tree::CategoryTreeDto;
