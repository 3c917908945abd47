pub mod delivery;
pub mod delivery_item;
pub mod expense;
pub mod grid_cell;
pub mod grid_row;
pub mod kahon_item;
pub mod order;
pub mod per_unit_price;
pub mod product;
pub mod sack_price;
pub mod sale;
pub mod sale_item;
pub mod sheet;
pub mod special_price;
pub mod transfer;
