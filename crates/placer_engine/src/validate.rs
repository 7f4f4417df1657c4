//! Input validation, run before any simulation state is allocated.

use crate::error::PlacementError;
use crate::model::{BoardConstraints, PlacementInput};
use placer_common::Rect;
use placer_config::PlacementConfig;
use std::collections::HashSet;

/// Returns the usable interior of the board, or an error if there is none.
pub fn usable_area(board: &BoardConstraints, margin: f64) -> Result<Rect, PlacementError> {
    let invalid = || PlacementError::InvalidBoard {
        width: board.width,
        height: board.height,
        margin,
    };
    if !(board.width.is_finite() && board.height.is_finite()) {
        return Err(invalid());
    }
    if !(margin.is_finite() && margin >= 0.0) {
        return Err(invalid());
    }
    if board.width <= 2.0 * margin || board.height <= 2.0 * margin {
        return Err(invalid());
    }
    Ok(Rect::new(
        margin,
        margin,
        board.width - margin,
        board.height - margin,
    ))
}

/// Checks that `input` and `config` describe a run that can start.
///
/// On success returns the usable interior of the board.
pub fn validate_input(
    input: &PlacementInput,
    config: &PlacementConfig,
) -> Result<Rect, PlacementError> {
    config.validate()?;

    if input.components.is_empty() {
        return Err(PlacementError::EmptyComponents);
    }

    let margin = input.board.margin_or(config.board_margin);
    let interior = usable_area(&input.board, margin)?;

    let mut seen = HashSet::with_capacity(input.components.len());
    for c in &input.components {
        if !seen.insert(c.id.as_str()) {
            return Err(PlacementError::DuplicateComponent(c.id.clone()));
        }
        let finite_positive = |v: f64| v.is_finite() && v > 0.0;
        if !(finite_positive(c.width) && finite_positive(c.height)) {
            return Err(PlacementError::InvalidDimensions {
                id: c.id.clone(),
                width: c.width,
                height: c.height,
            });
        }
        if c.width > interior.width() || c.height > interior.height() {
            return Err(PlacementError::ComponentExceedsBoard {
                id: c.id.clone(),
                width: c.width,
                height: c.height,
                usable_width: interior.width(),
                usable_height: interior.height(),
            });
        }
        if c.locked && c.fixed_position.is_none() {
            return Err(PlacementError::MissingFixedPosition(c.id.clone()));
        }
        let bad_position = [c.fixed_position, c.initial_position]
            .iter()
            .flatten()
            .any(|p| !p.is_finite());
        if bad_position {
            return Err(PlacementError::InvalidPosition(c.id.clone()));
        }
    }

    for (index, conn) in input.connections.iter().enumerate() {
        for id in [&conn.component_a, &conn.component_b] {
            if !seen.contains(id.as_str()) {
                return Err(PlacementError::UnknownComponent {
                    context: format!("connection {index}"),
                    id: id.clone(),
                });
            }
        }
    }

    for net in &input.nets {
        if let Some(missing) = net.members.iter().find(|m| !seen.contains(m.as_str())) {
            return Err(PlacementError::UnknownComponent {
                context: format!("net '{}'", net.name),
                id: missing.clone(),
            });
        }
    }

    Ok(interior)
}
