use crate::graphs::VertexId;

/// One bit per vertex, set once the vertex has been contracted.
#[derive(Clone, Debug, Default)]
pub struct ContractedFlags {
    words: Vec<u64>,
    number_of_vertices: u32,
    number_of_contracted: u32,
}

impl ContractedFlags {
    pub fn new(number_of_vertices: u32) -> Self {
        ContractedFlags {
            words: vec![0; (number_of_vertices as usize).div_ceil(64)],
            number_of_vertices,
            number_of_contracted: 0,
        }
    }

    /// Vertices outside the tracked range count as not contracted.
    pub fn is_contracted(&self, vertex: VertexId) -> bool {
        self.words
            .get(vertex as usize / 64)
            .is_some_and(|word| word & (1u64 << (vertex % 64)) != 0)
    }

    /// Marks `vertex` contracted and returns whether it was not before.
    pub fn set_contracted(&mut self, vertex: VertexId) -> bool {
        assert!(
            vertex < self.number_of_vertices,
            "vertex {} out of bounds",
            vertex
        );
        let word = &mut self.words[vertex as usize / 64];
        let mask = 1u64 << (vertex % 64);
        let newly_contracted = *word & mask == 0;
        *word |= mask;
        if newly_contracted {
            self.number_of_contracted += 1;
        }
        newly_contracted
    }

    pub fn number_of_contracted(&self) -> u32 {
        self.number_of_contracted
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.number_of_vertices
    }
}
