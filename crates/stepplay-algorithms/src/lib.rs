#![forbid(unsafe_code)]

//! Step producers for classic algorithms.
//!
//! # Key Components
//!
//! - [`sort`]: bubble, heap, merge, and radix sort over an [`ArrayForm`].
//! - [`search`]: binary search and two pointers over a [`SearchForm`],
//!   sliding window over a [`WindowForm`].
//! - [`graph`]: DFS (lazy), BFS, Kahn's topological sort, and Kruskal's MST
//!   over a [`GraphForm`].
//! - [`view`]: [`ArrayView`] and [`GraphView`], in-memory visual models that
//!   implement [`VisualApplier`](stepplay_runtime::VisualApplier).
//!
//! # Example
//!
//! ```
//! use stepplay_algorithms::{ArrayView, HeapSort};
//! use stepplay_core::ArrayForm;
//! use stepplay_runtime::{DeterministicClock, PlaybackController, PlaybackState};
//!
//! let mut player = PlaybackController::new(HeapSort, ArrayView::new(), DeterministicClock::new());
//! player.start(&ArrayForm::new("5 2 9 1")).unwrap();
//! while player.state() != PlaybackState::Finished {
//!     player.clock_mut().advance_ms(500);
//!     player.poll();
//! }
//! assert!(player.applier().all_sorted());
//! ```
//!
//! [`ArrayForm`]: stepplay_core::ArrayForm
//! [`SearchForm`]: stepplay_core::SearchForm
//! [`WindowForm`]: stepplay_core::WindowForm
//! [`GraphForm`]: stepplay_core::GraphForm

pub mod graph;
pub mod search;
pub mod sort;
pub mod view;

pub use graph::{BreadthFirstSearch, DepthFirstSearch, MinimumSpanningTree, TopologicalSort};
pub use search::{BinarySearch, SlidingWindow, TwoPointers};
pub use sort::{BubbleSort, HeapSort, MergeSort, RadixSort};
pub use view::{ArrayView, EdgeMark, GraphView, NodeMark, SlotMark};
