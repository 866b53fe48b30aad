/// Class identity of a group of files (the label subdirectory name).
/// Examples: `cats`, `s12`
pub type Label = String;
/// File name inside a label directory.
/// Example: `0001.jpg`
pub type FileName = String;
/// Path strings stored inside pair indexes and snapshots.
/// Examples: `cats/0001.jpg` (root-relative), `/data/faces/cats/0001.jpg` (resolved)
pub type PathString = String;
/// Numeric pair label handed to consumers (`0` similar, `1` different).
pub type NumericLabel = u8;
/// Position of a class in the sorted class list of a labeled folder.
pub type ClassIndex = usize;
