//! Asynchronous decode-on-add.
//!
//! Each submitted file is decoded on tokio's blocking pool and reports back
//! over a flume channel. The queue never touches the item store: the editor
//! drains finished outcomes on its own thread and appends them, so all
//! store mutation stays single-threaded.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use crate::error::GalleryError;
use crate::image_loader::{self, DecodedImage, ImageFile};

type Decoder = fn(&ImageFile) -> Result<DecodedImage, GalleryError>;

/// Order in which decoded files are released to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddOrder {
    /// Release as soon as each decode finishes.
    #[default]
    Completion,
    /// Hold finished decodes until every earlier submission has resolved.
    Submission,
}

/// Result of one decode task.
#[derive(Debug)]
pub enum DecodeOutcome {
    Decoded {
        ticket: u64,
        image: DecodedImage,
    },
    Rejected {
        ticket: u64,
        name: String,
        error: GalleryError,
    },
}

impl DecodeOutcome {
    pub fn ticket(&self) -> u64 {
        match self {
            Self::Decoded { ticket, .. } | Self::Rejected { ticket, .. } => *ticket,
        }
    }

    pub fn decoded(&self) -> Option<&DecodedImage> {
        match self {
            Self::Decoded { image, .. } => Some(image),
            Self::Rejected { .. } => None,
        }
    }
}

pub struct DecodeQueue {
    order: AddOrder,
    tx: flume::Sender<DecodeOutcome>,
    rx: flume::Receiver<DecodeOutcome>,
    next_ticket: u64,
    /// Next ticket to release in submission order.
    next_release: u64,
    held: BTreeMap<u64, DecodeOutcome>,
    in_flight: usize,
}

impl DecodeQueue {
    pub fn new(order: AddOrder) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            order,
            tx,
            rx,
            next_ticket: 0,
            next_release: 0,
            held: BTreeMap::new(),
            in_flight: 0,
        }
    }

    pub fn order(&self) -> AddOrder {
        self.order
    }

    /// Decodes still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Finished decodes waiting on an earlier submission.
    pub fn held(&self) -> usize {
        self.held.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && self.held.is_empty()
    }

    /// Starts decoding `file` and returns its ticket.
    ///
    /// Outside a tokio runtime the file is decoded inline; the outcome is
    /// still delivered through the queue.
    pub fn submit(&mut self, file: ImageFile) -> u64 {
        self.submit_with(file, image_loader::decode_dimensions)
    }

    fn submit_with(&mut self, file: ImageFile, decoder: Decoder) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        let job = move || {
            let outcome = decode(ticket, file, decoder);
            // The receiver lives as long as the queue.
            let _ = tx.send(outcome);
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                trace!(ticket, "No runtime, decoding inline");
                job();
            }
        }
        debug!(ticket, in_flight = self.in_flight, "Decode submitted");
        ticket
    }

    /// Collects every outcome that is ready without waiting.
    pub fn poll(&mut self) -> Vec<DecodeOutcome> {
        let mut released = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            self.accept(outcome, &mut released);
        }
        released
    }

    /// Waits for every submitted decode and returns the remaining outcomes.
    pub async fn settle(&mut self) -> Vec<DecodeOutcome> {
        let mut released = self.poll();
        while self.in_flight > 0 {
            match self.rx.recv_async().await {
                Ok(outcome) => self.accept(outcome, &mut released),
                Err(_) => break,
            }
        }
        released
    }

    fn accept(&mut self, outcome: DecodeOutcome, released: &mut Vec<DecodeOutcome>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match self.order {
            AddOrder::Completion => released.push(outcome),
            AddOrder::Submission => {
                self.held.insert(outcome.ticket(), outcome);
                while let Some(next) = self.held.remove(&self.next_release) {
                    self.next_release += 1;
                    released.push(next);
                }
            }
        }
    }
}

impl Default for DecodeQueue {
    fn default() -> Self {
        Self::new(AddOrder::default())
    }
}

/// Runs `decoder`, turning a panic into a rejection so every ticket
/// reports back exactly once.
fn decode(ticket: u64, file: ImageFile, decoder: Decoder) -> DecodeOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| decoder(&file))).unwrap_or_else(|_| {
        Err(GalleryError::DecoderPanicked {
            name: file.name.clone(),
        })
    });
    match result {
        Ok(image) => {
            trace!(ticket, src = %image.src, width = image.width, height = image.height, "Decoded");
            DecodeOutcome::Decoded { ticket, image }
        }
        Err(error) => {
            warn!(ticket, name = %file.name, "Rejected upload: {}", error);
            DecodeOutcome::Rejected {
                ticket,
                name: file.name,
                error,
            }
        }
    }
}
