use egui::{RichText, ScrollArea, Ui};

use crate::theme;

pub struct HelpSection {
    pub title: &'static str,
    pub lead: &'static str,
    pub items: &'static [&'static str],
    pub numbered: bool,
}

pub const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Program Description",
        lead: "Create and customize event diagrams with these features:",
        items: &[
            "View and copy pre-made event diagrams",
            "Create custom diagrams with numbers/lines/text",
            "Save your custom creations",
        ],
        numbered: false,
    },
    HelpSection {
        title: "View Tab Instructions",
        lead: "Using the View tab:",
        items: &[
            "Select event type from first dropdown",
            "Select umpire count from second dropdown",
            "Right-click image or press 'C' to copy",
        ],
        numbered: true,
    },
    HelpSection {
        title: "Edit Tab Instructions",
        lead: "Using the Edit tab:",
        items: &[
            "Add numbers with buttons (drag to move)",
            "Add lines/curves (R to rotate)",
            "Add resizable text boxes (double-click to edit, enter to submit)",
            "Backspace deletes selected items",
            "Save button exports final image",
        ],
        numbered: true,
    },
];

pub fn item_marker(section: &HelpSection, index: usize) -> String {
    if section.numbered {
        format!("{}.", index + 1)
    } else {
        "•".to_owned()
    }
}

pub fn show_help(ui: &mut Ui) {
    let theme = theme::athletics_theme();

    ScrollArea::vertical()
        .id_source("help_scroll")
        .show(ui, |ui| {
            for section in HELP_SECTIONS {
                ui.add_space(theme.layout.space_2);
                ui.label(RichText::new(section.title).heading().strong());
                ui.label(RichText::new(section.lead).strong());
                for (index, item) in section.items.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.add_space(theme.layout.space_3);
                        ui.label(item_marker(section, index));
                        ui.label(*item);
                    });
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::{item_marker, HELP_SECTIONS};

    #[test]
    fn sections_appear_in_tab_order() {
        let titles: Vec<_> = HELP_SECTIONS.iter().map(|section| section.title).collect();
        assert_eq!(
            titles,
            ["Program Description", "View Tab Instructions", "Edit Tab Instructions"]
        );
    }

    #[test]
    fn instructions_are_numbered_and_description_is_bulleted() {
        assert_eq!(item_marker(&HELP_SECTIONS[0], 0), "•");
        assert_eq!(item_marker(&HELP_SECTIONS[2], 3), "4.");
        assert!(HELP_SECTIONS[2].items[1].contains("R to rotate"));
    }
}
