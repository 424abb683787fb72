//! Presentation of warp records and command replies.
//!
//! Everything here is a pure function over data: turning a record into a
//! display line, slicing a sequence into a page, and rendering a [`Reply`]
//! as the lines a sender should see.

use warpgate_types::NamedLocation;

use crate::error::WarpError;
use crate::service::Reply;

/// Heading shown above warp listings.
pub const LIST_TITLE: &str = "Warps";

/// One page of a longer sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// 1-based page number.
    pub number: usize,
    /// Total number of pages (0 when there are no items).
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
    /// The items on this page.
    pub items: Vec<T>,
}

/// Slice `items` into pages of `per_page` and return page `number` (1-based).
///
/// An empty sequence yields an empty page 1.
///
/// # Errors
///
/// Returns [`WarpError::PageOutOfRange`] for page 0 or a page past the end.
pub fn paginate<T>(items: Vec<T>, number: usize, per_page: usize) -> Result<Page<T>, WarpError> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let in_range = number >= 1 && (number <= total_pages || (total_pages == 0 && number == 1));
    if !in_range {
        return Err(WarpError::PageOutOfRange {
            page: number,
            total: total_pages,
        });
    }
    let skip = number.saturating_sub(1).saturating_mul(per_page);
    Ok(Page {
        number,
        total_pages,
        total_items,
        items: items.into_iter().skip(skip).take(per_page).collect(),
    })
}

/// Single listing line: `HOME (Owner: Alice, World: world)`.
pub fn format_list_line(warp: &NamedLocation) -> String {
    format!(
        "{} (Owner: {}, World: {})",
        warp.name.to_uppercase(),
        owner_label(warp),
        warp.display_world()
    )
}

/// Multi-line detail view of one warp.
pub fn format_info(warp: &NamedLocation) -> Vec<String> {
    let pos = &warp.position;
    vec![
        format!("Warp: {}", warp.name),
        format!("Owner: {}", owner_label(warp)),
        format!("World: {}", warp.display_world()),
        format!("Location: ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z),
        format!("Facing: yaw {:.1}, pitch {:.1}", pos.yaw, pos.pitch),
        format!("Created: {}", warp.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
    ]
}

fn owner_label(warp: &NamedLocation) -> &str {
    warp.creator_name.as_deref().unwrap_or("none")
}

/// Lines to show the sender for a successful command.
pub fn render(reply: &Reply) -> Vec<String> {
    match reply {
        Reply::Teleported {
            warp,
            moved,
            failed,
            ..
        } => {
            let mut lines = vec![match moved.as_slice() {
                [only] => format!("Teleported {} to warp '{}'.", only.name, warp.name),
                _ => format!("Teleported {} players to warp '{}'.", moved.len(), warp.name),
            }];
            lines.extend(
                failed
                    .iter()
                    .map(|actor| format!("Could not teleport {}.", actor.name)),
            );
            lines
        }
        Reply::Created { warp, replaced } => {
            if *replaced {
                vec![format!("Warp '{}' overwritten.", warp.name)]
            } else {
                vec![format!("Warp '{}' created.", warp.name)]
            }
        }
        Reply::Info(warp) => format_info(warp),
        Reply::Removed(warp) => vec![format!("Warp '{}' removed.", warp.name)],
        Reply::Listing(page) => {
            if page.items.is_empty() {
                return vec![String::from("No results match!")];
            }
            let mut lines = vec![format!(
                "{LIST_TITLE} (page {}/{})",
                page.number, page.total_pages
            )];
            lines.extend(page.items.iter().map(format_list_line));
            lines
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use warpgate_types::{Actor, Position};

    use super::*;

    fn warp(name: &str, owner: Option<&str>, world_name: Option<&str>) -> NamedLocation {
        NamedLocation {
            name: name.to_owned(),
            world_name: world_name.map(str::to_owned),
            position: Position::new("overworld", 1.5, 64.0, -7.5),
            creator_name: owner.map(str::to_owned),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn paginate_middle_and_last_pages() {
        let items: Vec<u32> = (1..=20).collect();
        let page = paginate(items.clone(), 2, 9).unwrap();
        assert_eq!(page.items, (10..=18).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 20);

        let last = paginate(items, 3, 9).unwrap();
        assert_eq!(last.items, vec![19, 20]);
    }

    #[test]
    fn paginate_out_of_range() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(matches!(
            paginate(items.clone(), 2, 9),
            Err(WarpError::PageOutOfRange { page: 2, total: 1 })
        ));
        assert!(matches!(
            paginate(items, 0, 9),
            Err(WarpError::PageOutOfRange { page: 0, .. })
        ));
    }

    #[test]
    fn paginate_empty_is_page_one() {
        let page = paginate(Vec::<u32>::new(), 1, 9).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(paginate(Vec::<u32>::new(), 2, 9).is_err());
    }

    #[test]
    fn list_line_format() {
        assert_eq!(
            format_list_line(&warp("home", Some("Alice"), Some("w"))),
            "HOME (Owner: Alice, World: w)"
        );
        assert_eq!(
            format_list_line(&warp("spawn", None, None)),
            "SPAWN (Owner: none, World: overworld)"
        );
    }

    #[test]
    fn info_lists_coordinates() {
        let lines = format_info(&warp("home", Some("Alice"), Some("w")));
        assert!(lines.contains(&String::from("Location: (1.5, 64.0, -7.5)")));
        assert!(lines.contains(&String::from("Owner: Alice")));
    }

    #[test]
    fn render_teleport_reports_failures() {
        let alice = Actor::new("Alice");
        let bob = Actor::new("Bob");
        let reply = Reply::Teleported {
            warp: warp("home", None, None),
            moved: vec![alice],
            failed: vec![bob],
            silent: false,
        };
        assert_eq!(
            render(&reply),
            vec![
                String::from("Teleported Alice to warp 'home'."),
                String::from("Could not teleport Bob."),
            ]
        );
    }

    #[test]
    fn render_empty_listing() {
        let reply = Reply::Listing(paginate(Vec::new(), 1, 9).unwrap());
        assert_eq!(render(&reply), vec![String::from("No results match!")]);
    }

    #[test]
    fn render_listing_has_title() {
        let page = paginate(vec![warp("a", Some("Alice"), Some("w"))], 1, 9).unwrap();
        let lines = render(&Reply::Listing(page));
        assert_eq!(lines.first().map(String::as_str), Some("Warps (page 1/1)"));
        assert_eq!(lines.len(), 2);
    }
}
