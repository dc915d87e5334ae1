pub mod dom_indices;
pub mod html_tree;
