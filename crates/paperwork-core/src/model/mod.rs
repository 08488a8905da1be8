pub mod composition;
pub mod ids;
pub mod share;
pub mod work_code;
pub mod writer;

pub use composition::Composition;
pub use ids::{CompositionId, ProfileId, WriterId};
pub use share::Share;
pub use work_code::WorkCode;
pub use writer::{Profile, Writer, WriterRole};
