// Incremental encoding and decoding.
//
// - `cursor`: bit accumulators shared by both directions, no I/O
// - `writer`: `EncodingWriter`, a `Write` adapter producing text
// - `reader`: `DecodingReader`, a `Read` adapter consuming text
//
// Streams accept any amount of input per call and produce exactly the bulk
// codec's output for the concatenated input.

pub mod cursor;
pub mod reader;
pub mod writer;

pub use cursor::{DecodeCursor, EncodeCursor};
pub use reader::DecodingReader;
pub use writer::EncodingWriter;
