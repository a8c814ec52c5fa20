//! Conversion into persistent vectors (feature `persistent`).

use im::Vector as ImVector;

use crate::seq::Seq;

impl<T: Clone + 'static> Seq<T> {
    /// Collect a finite sequence into an `im::Vector` with structural sharing.
    ///
    /// Does not terminate on an infinite sequence.
    pub fn to_vector(&self) -> ImVector<T> {
        self.iter().cloned().collect()
    }
}
