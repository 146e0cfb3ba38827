pub mod avl;
pub mod dynarray;
pub mod graph;
pub mod hashmap;
pub mod heap;
