use super::{CliSession, new_session};
use crate::cli::BoxArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use emdy_setup::core::dry_run::DryRunLibrary;
use emdy_setup::engine::box_policy::{self, BoxFieldStates, FieldState};
use tracing::info;

fn describe(state: &FieldState) -> String {
    match state {
        FieldState::Editable { default: Some(v) } => format!("editable (default {})", v),
        FieldState::Editable { default: None } => "editable (empty)".to_string(),
        FieldState::Fixed(v) => format!("fixed at {}", v),
        FieldState::Disabled => "disabled".to_string(),
    }
}

pub fn render(states: &BoxFieldStates) -> String {
    let mut lines = vec![format!("Shape: {}", states.shape)];
    let rows = [
        ("center", ["x", "y", "z"], &states.center),
        ("length", ["a", "b", "c"], &states.lengths),
        ("angle", ["alpha", "beta", "gamma"], &states.angles),
    ];
    for (group, names, fields) in rows {
        for (name, state) in names.iter().zip(fields.iter()) {
            lines.push(format!("  {:<6} {:<5} {}", group, name, describe(state)));
        }
    }
    let padding = if states.padding_forced_off {
        "forced off"
    } else if states.padding_entry_editable {
        "on (editable)"
    } else {
        "off"
    };
    lines.push(format!(
        "  padding      {}{}",
        padding,
        if states.padding_toggle_enabled {
            ""
        } else {
            ", toggle locked"
        }
    ));
    lines.join("\n")
}

/// Shows the input structure, the optional axes and the solvation boundary,
/// returning the viewer objects that were on screen before clearing them.
fn draw(session: &mut CliSession<'_>, axes: bool) -> Result<Vec<String>> {
    if let Some(structure) = session.config().io.structure.clone() {
        session.set_structure_path(structure)?;
    }
    if axes {
        session.toggle_axes()?;
    }
    session.toggle_box()?;
    let shown = session.viewer().objects().to_vec();
    session.reset()?;
    Ok(shown)
}

/// Prints the field-state table for the shape and padding switch of the form.
pub fn run(args: BoxArgs) -> Result<()> {
    let config = build_config(&args.form)?;
    if args.draw || args.axes {
        let library = DryRunLibrary::new();
        let progress = CliProgressHandler::new();
        let mut session = new_session(&library, config.clone(), &progress);
        let shown = draw(&mut session, args.axes)?;
        info!("Viewer cleared after drawing {} object(s).", shown.len());
        println!("Drawn: {}", shown.join(", "));
    }

    let form = &config.solvation;
    let states = box_policy::field_states(form.shape, form.use_padding);
    println!("{}", render(&states));

    match box_policy::resolve_geometry(form) {
        Ok(geometry) => match geometry.volume() {
            Some(volume) => println!("Volume: {:.1} Å³", volume),
            None => println!("Volume: undefined for these angles"),
        },
        Err(reason) => println!("Volume: not known before solvation ({})", reason),
    }
    Ok(())
}
