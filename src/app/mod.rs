pub mod pages;
pub mod part_repository;
pub mod view;
