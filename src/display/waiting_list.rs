use std::time::Duration;

/// Teams shown per page once the list is paginated.
pub const PAGE_SIZE: usize = 2;

/// Which part of the waiting list is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingListPage {
    /// The whole list.
    All,
    /// The page starting at the given offset.
    Partial(usize),
}

/// Interval-driven pagination of the waiting list.
///
/// With more than [`PAGE_SIZE`] teams each tick moves `All → Partial(0) →
/// Partial(2) → …` and back to `All` once the offset runs past the end.
#[derive(Debug, Clone)]
pub struct WaitingListRotator {
    page: WaitingListPage,
    display_time_secs: u32,
}

impl WaitingListRotator {
    /// Start on [`WaitingListPage::All`].
    pub fn new(display_time_secs: u32) -> Self {
        Self {
            page: WaitingListPage::All,
            display_time_secs,
        }
    }

    /// Page currently on screen.
    pub fn page(&self) -> WaitingListPage {
        self.page
    }

    /// Tick period. A zero display time counts as one second.
    pub fn period(&self) -> Duration {
        Duration::from_secs(u64::from(self.display_time_secs.max(1)))
    }

    /// Adopt a new display time, returning whether it differs from the current one.
    pub fn set_display_time(&mut self, display_time_secs: u32) -> bool {
        let changed = self.display_time_secs != display_time_secs;
        self.display_time_secs = display_time_secs;
        changed
    }

    /// Bring the page back in range after the team list changed size.
    pub fn normalize(&mut self, team_count: usize) {
        match self.page {
            _ if team_count <= PAGE_SIZE => self.page = WaitingListPage::All,
            WaitingListPage::Partial(offset) if offset >= team_count => {
                self.page = WaitingListPage::All
            }
            _ => {}
        }
    }

    /// Advance one interval.
    pub fn tick(&mut self, team_count: usize) -> WaitingListPage {
        self.page = if team_count <= PAGE_SIZE {
            WaitingListPage::All
        } else {
            match self.page {
                WaitingListPage::All => WaitingListPage::Partial(0),
                WaitingListPage::Partial(offset) => {
                    let next = offset + PAGE_SIZE;
                    if next >= team_count {
                        WaitingListPage::All
                    } else {
                        WaitingListPage::Partial(next)
                    }
                }
            }
        };
        self.page
    }

    /// Slice of `teams` visible on the current page.
    pub fn visible<'a, T>(&self, teams: &'a [T]) -> &'a [T] {
        match self.page {
            _ if teams.len() <= PAGE_SIZE => teams,
            WaitingListPage::All => teams,
            WaitingListPage::Partial(offset) => {
                let start = offset.min(teams.len());
                let end = (offset + PAGE_SIZE).min(teams.len());
                &teams[start..end]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(team_count: usize, ticks: usize) -> Vec<WaitingListPage> {
        let mut rotator = WaitingListRotator::new(5);
        (0..ticks).map(|_| rotator.tick(team_count)).collect()
    }

    #[test]
    fn no_teams_stays_on_all() {
        let mut rotator = WaitingListRotator::new(5);
        assert_eq!(rotator.tick(0), WaitingListPage::All);
        assert!(rotator.visible::<u8>(&[]).is_empty());
    }

    #[test]
    fn two_teams_never_paginate() {
        assert_eq!(cycle(2, 4), vec![WaitingListPage::All; 4]);
    }

    #[test]
    fn five_teams_cycle_through_pages() {
        use WaitingListPage::*;
        assert_eq!(
            cycle(5, 5),
            vec![Partial(0), Partial(2), Partial(4), All, Partial(0)]
        );

        let teams = ["a", "b", "c", "d", "e"];
        let mut rotator = WaitingListRotator::new(5);
        rotator.tick(teams.len());
        assert_eq!(rotator.visible(&teams), ["a", "b"]);
        rotator.tick(teams.len());
        assert_eq!(rotator.visible(&teams), ["c", "d"]);
        rotator.tick(teams.len());
        assert_eq!(rotator.visible(&teams), ["e"]);
        rotator.tick(teams.len());
        assert_eq!(rotator.visible(&teams), teams);
    }

    #[test]
    fn three_teams_show_trailing_team_alone() {
        use WaitingListPage::*;
        assert_eq!(cycle(3, 4), vec![Partial(0), Partial(2), All, Partial(0)]);
    }

    #[test]
    fn shrinking_list_normalizes_page() {
        let mut rotator = WaitingListRotator::new(5);
        rotator.tick(5);
        rotator.tick(5);
        rotator.tick(5);
        assert_eq!(rotator.page(), WaitingListPage::Partial(4));

        rotator.normalize(4);
        assert_eq!(rotator.page(), WaitingListPage::All);

        rotator.tick(4);
        rotator.normalize(2);
        assert_eq!(rotator.page(), WaitingListPage::All);
    }

    #[test]
    fn zero_display_time_ticks_every_second() {
        let mut rotator = WaitingListRotator::new(0);
        assert_eq!(rotator.period(), Duration::from_secs(1));
        assert!(rotator.set_display_time(8));
        assert!(!rotator.set_display_time(8));
        assert_eq!(rotator.period(), Duration::from_secs(8));
    }
}
