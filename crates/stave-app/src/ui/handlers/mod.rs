//! Message handlers, one module per concern

mod channel;
mod playback;
mod result;
mod submit;
mod tick;
