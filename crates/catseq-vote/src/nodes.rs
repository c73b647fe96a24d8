use catseq_core::{Grammar, NodeIdMap, NodeSlot};

/// Assigns node ids to the characters of the base string.
///
/// Node characters receive sequential ids in order of appearance; every other
/// character maps to the shared dummy slot. One trailing dummy entry is
/// appended so the dummy is always present, even when every character is a
/// node.
pub fn base_node_map<G: Grammar + ?Sized>(word: &str, grammar: &G) -> NodeIdMap {
    let mut next = 0u64;
    let mut slots: Vec<NodeSlot> = word
        .chars()
        .map(|ch| {
            if grammar.is_node_char(ch) {
                let slot = NodeSlot::node(next);
                next += 1;
                slot
            } else {
                NodeSlot::Dummy
            }
        })
        .collect();
    slots.push(NodeSlot::Dummy);
    NodeIdMap::new(slots)
}
