// Parser tests
mod expression_parsing;



// Renderer tests
mod render;
