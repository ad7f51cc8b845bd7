pub mod use_infinite_scroll;

pub use use_infinite_scroll::{
    InfiniteScrollConfig, InfiniteScrollHandle, use_infinite_scroll,
};
