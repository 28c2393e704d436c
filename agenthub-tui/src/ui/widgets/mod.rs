mod dialog;
mod footer;
mod form;
mod header;

pub use dialog::{ConfirmDialog, DialogButton, DialogResult, DialogState};
pub use footer::Footer;
pub use form::{FormDialog, FormField, FormKind, FormOutput};
pub use header::{spinner_frame, Header};
