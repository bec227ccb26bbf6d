use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use log::debug;

use kbe_shared::{Bundle, BundleReader, CallContext, EntityId};

use crate::error::MailboxError;

/// Invoked by the transport if and when a server response correlates to a posted mail
pub type ResponseHandler = Box<dyn FnOnce(&mut BundleReader<'_>)>;

/// A finished Bundle handed over to the transport, tagged with its destination
pub struct PostedMail {
    pub entity_id: EntityId,
    pub context: CallContext,
    pub payload: Vec<u8>,
    pub response_handler: Option<ResponseHandler>,
}

impl fmt::Debug for PostedMail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostedMail")
            .field("entity_id", &self.entity_id)
            .field("context", &self.context)
            .field("payload", &self.payload)
            .field("response_handler", &self.response_handler.is_some())
            .finish()
    }
}

/// FIFO queue of posted mail shared by every Mailbox of a session.
///
/// Cloning an Outbox yields another handle to the same queue. The transport
/// drains it once per tick, in the order mails were posted.
#[derive(Clone, Default)]
pub struct Outbox {
    queue: Rc<RefCell<VecDeque<PostedMail>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, mail: PostedMail) {
        self.queue.borrow_mut().push_back(mail);
    }

    /// Removes and returns every pending mail, oldest first
    pub fn drain(&self) -> Vec<PostedMail> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Addressable remote endpoint of one entity in one execution context.
///
/// Holds at most one open Bundle. `new_mail()` opens it, `post_mail()`
/// moves it into the Outbox, after which it can no longer be reached.
pub struct Mailbox {
    entity_id: EntityId,
    context: CallContext,
    bundle: Option<Bundle>,
    outbox: Outbox,
}

impl Mailbox {
    pub fn new(entity_id: EntityId, context: CallContext, outbox: Outbox) -> Self {
        Self {
            entity_id,
            context,
            bundle: None,
            outbox,
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn context(&self) -> CallContext {
        self.context
    }

    pub fn is_open(&self) -> bool {
        self.bundle.is_some()
    }

    /// Opens a fresh Bundle for one outgoing call
    pub fn new_mail(&mut self) -> Result<&mut Bundle, MailboxError> {
        if self.bundle.is_some() {
            return Err(MailboxError::AlreadyOpen {
                entity_id: self.entity_id,
                context: self.context,
            });
        }
        Ok(self.bundle.insert(Bundle::new()))
    }

    /// The currently open Bundle
    pub fn bundle_mut(&mut self) -> Result<&mut Bundle, MailboxError> {
        let (entity_id, context) = (self.entity_id, self.context);
        self.bundle
            .as_mut()
            .ok_or(MailboxError::NotOpen { entity_id, context })
    }

    /// Hands the open Bundle to the transport and closes the mailbox
    pub fn post_mail(&mut self, response_handler: Option<ResponseHandler>) -> Result<(), MailboxError> {
        let Some(bundle) = self.bundle.take() else {
            return Err(MailboxError::NotOpen {
                entity_id: self.entity_id,
                context: self.context,
            });
        };

        debug!(
            "Mailbox {}:{} posting {} bytes",
            self.entity_id,
            self.context,
            bundle.len()
        );
        self.outbox.push(PostedMail {
            entity_id: self.entity_id,
            context: self.context,
            payload: bundle.to_bytes(),
            response_handler,
        });
        Ok(())
    }

    /// Abandons the open Bundle without sending it. Returns whether one was open.
    pub fn discard_mail(&mut self) -> bool {
        self.bundle.take().is_some()
    }
}
