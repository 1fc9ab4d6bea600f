//! Conversion between integer RGBA rasters and real-valued RGB samples.

pub mod convert;
