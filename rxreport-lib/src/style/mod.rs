pub mod inline_style;
pub mod owned_css;
pub mod rule_parser;
