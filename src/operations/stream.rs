#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;

use eyre::Result;
use futures::StreamExt;

use crate::{
    backend::FragmentStream,
    models::{ArcEventTx, Citation, Event, TextFragment, merge_citations},
};

/// Accumulated state of a streamed turn
#[derive(Debug, Default, Clone)]
pub struct StreamAggregator {
    text: String,
    citations: Vec<Citation>,
}

impl StreamAggregator {
    pub fn push(&mut self, fragment: TextFragment) {
        self.text.push_str(&fragment.text);
        merge_citations(&mut self.citations, fragment.citations);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }
}

/// Consume `stream` to the end, publishing the pending turn after every
/// fragment. Exactly one of `TurnCompleted` / `TurnFailed` closes the turn.
/// Only a closed event channel is reported as an error.
pub async fn aggregate_turn(
    mut stream: FragmentStream,
    version: u64,
    turn_id: &str,
    event_tx: ArcEventTx,
) -> Result<()> {
    let mut aggregator = StreamAggregator::default();

    while let Some(item) = stream.next().await {
        let fragment = match item {
            Ok(fragment) => fragment,
            Err(err) => {
                log::error!("Turn {} failed: {}", turn_id, err);
                event_tx
                    .send(Event::TurnFailed {
                        version,
                        turn_id: turn_id.to_string(),
                        error: err.to_string(),
                    })
                    .await?;
                return Ok(());
            }
        };

        aggregator.push(fragment);
        event_tx
            .send(Event::TurnUpdated {
                version,
                turn_id: turn_id.to_string(),
                text: aggregator.text().to_string(),
                citations: aggregator.citations().to_vec(),
            })
            .await?;
    }

    log::debug!(
        "Turn {} completed with {} chars",
        turn_id,
        aggregator.text().len()
    );
    event_tx
        .send(Event::TurnCompleted {
            version,
            turn_id: turn_id.to_string(),
        })
        .await?;
    Ok(())
}
