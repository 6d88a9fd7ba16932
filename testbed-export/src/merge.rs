//! K-way merge of ascending scrolls

use crate::errors::ExportResult;
use crate::row::ScrolledRow;
use crate::scroll::Scroll;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Merges several scrolls, each ascending by timestamp, into one ascending
/// sequence. Rows with equal timestamps come out in source order.
pub struct MergedScroll<'c> {
    sources: Vec<Scroll<'c>>,
    heads: Vec<Option<ScrolledRow>>,
    heap: BinaryHeap<Reverse<(i64, usize)>>,
    primed: bool,
}

impl<'c> MergedScroll<'c> {
    pub fn new(sources: Vec<Scroll<'c>>) -> Self {
        let heads = sources.iter().map(|_| None).collect();
        Self {
            sources,
            heads,
            heap: BinaryHeap::new(),
            primed: false,
        }
    }

    pub fn queries_issued(&self) -> usize {
        self.sources.iter().map(Scroll::queries_issued).sum()
    }

    pub async fn next_row(&mut self) -> ExportResult<Option<ScrolledRow>> {
        if !self.primed {
            for index in 0..self.sources.len() {
                self.advance(index).await?;
            }
            self.primed = true;
        }

        let Some(Reverse((_, index))) = self.heap.pop() else {
            return Ok(None);
        };
        let row = self.heads[index].take();
        self.advance(index).await?;
        Ok(row)
    }

    async fn advance(&mut self, index: usize) -> ExportResult<()> {
        if let Some(row) = self.sources[index].next_row().await? {
            self.heap.push(Reverse((row.timestamp, index)));
            self.heads[index] = Some(row);
        }
        Ok(())
    }
}
