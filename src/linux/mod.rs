pub mod xorg_session;

pub use xorg_session::{WorkspaceIsolation, XorgApp, XorgSession};
