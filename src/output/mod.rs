pub(crate) mod color_order;
pub(crate) mod controller;
pub(crate) mod packer;
