// Layout: the shared résumé section model and the A4 page geometry used by
// raster export. Both are pure data; nothing here performs I/O.

pub mod page;
pub mod sections;
