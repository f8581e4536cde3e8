//! Modal presentation capability: fire-and-forget notifications telling the
//! shell to show or hide the single shared overlay. Implicit dismissal (for
//! example the escape key on a native `<dialog>`) travels the other way, as
//! an `Event::RemovalDialogDismissed` fed by the shell.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModalOperation {
    Open,
    Close,
}

impl Operation for ModalOperation {
    type Output = ();
}

pub struct Modal<Ev> {
    context: CapabilityContext<ModalOperation, Ev>,
}

impl<Ev> Capability<Ev> for Modal<Ev> {
    type Operation = ModalOperation;
    type MappedSelf<MappedEv> = Modal<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Modal::new(self.context.map_event(f))
    }
}

impl<Ev> Modal<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<ModalOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn open(&self) {
        self.notify(ModalOperation::Open);
    }

    pub fn close(&self) {
        self.notify(ModalOperation::Close);
    }

    fn notify(&self, operation: ModalOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
