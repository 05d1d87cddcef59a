//! Small pure helpers shared by the node handle and the encoders.

pub mod attr;
