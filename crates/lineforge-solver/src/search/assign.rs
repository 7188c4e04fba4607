//! Slot assignment for a solved player set.

use lineforge_core::{Lineup, LineupSlot, OptimizerError, Result, SlotKind};

use crate::model::ConstraintModel;

/// Places the selected players into roster slots in template order.
///
/// The captain, if any, takes the captain slot. Single-position slots are
/// filled next with the best remaining player of that position, multi-position
/// slots last. `players` are model indices and must not contain the captain.
pub fn assign_slots(
    model: &ConstraintModel,
    captain: Option<usize>,
    players: &[usize],
) -> Result<Lineup> {
    let slots = model.roster().slots();
    let mut remaining: Vec<usize> = players.to_vec();
    // model order is score descending
    remaining.sort_unstable();
    let mut filled: Vec<Option<usize>> = vec![None; slots.len()];

    for (s, slot) in slots.iter().enumerate() {
        if slot.kind == SlotKind::Captain {
            filled[s] = Some(captain.ok_or_else(|| {
                OptimizerError::Internal(format!("no captain for slot {}", slot.label))
            })?);
        }
    }

    let single = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.kind == SlotKind::Standard && slot.eligible.len() == 1);
    let multi = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.kind == SlotKind::Standard && slot.eligible.len() > 1);
    for (s, slot) in single.chain(multi) {
        let at = remaining
            .iter()
            .position(|&i| slot.accepts(model.player(i).position))
            .ok_or_else(|| {
                OptimizerError::Internal(format!("no eligible player left for slot {}", slot.label))
            })?;
        filled[s] = Some(remaining.remove(at));
    }
    if !remaining.is_empty() {
        return Err(OptimizerError::Internal(format!(
            "{} selected players left without a slot",
            remaining.len()
        )));
    }

    let format = model.format();
    let mut lineup_slots = Vec::with_capacity(slots.len());
    for (slot, player) in slots.iter().zip(filled) {
        let player = player.ok_or_else(|| {
            OptimizerError::Internal(format!("slot {} left empty", slot.label))
        })?;
        lineup_slots.push(LineupSlot::new(
            slot.label,
            slot.kind,
            model.player(player),
            format,
        ));
    }
    Ok(Lineup::new(format, lineup_slots))
}
