/// File boundary module
///
/// This module handles everything that crosses the disk boundary:
/// - Reading uploaded thumbnail images and checking they are images
/// - Exporting compose documents as `.yaml` files

pub mod export;
pub mod thumbnail;
