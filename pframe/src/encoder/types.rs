//! Encoder types

bitflags! {
    /// Options which influence the motion search.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct EncoderOption : u8 {
        /// Refine each block's integer match with a local quarter-pixel
        /// search on the winning reference.
        const SUBPEL_REFINEMENT = 0b1;

        /// Search blocks concurrently on the global thread pool.
        ///
        /// Blocks are independent, so this never changes the resulting
        /// motion field.
        const PARALLEL_SEARCH = 0b10;
    }
}

impl Default for EncoderOption {
    fn default() -> Self {
        Self::SUBPEL_REFINEMENT | Self::PARALLEL_SEARCH
    }
}
