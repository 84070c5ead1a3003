use backend_domain::{level_for, LeaderboardEntry, LeaderboardQuery, Volunteer, VolunteerId};

use crate::{AppError, AppState};

const DEFAULT_LEADERBOARD_SIZE: usize = 10;
const MAX_LEADERBOARD_SIZE: usize = 100;

pub async fn get_volunteer(state: &AppState, id: VolunteerId) -> Result<Volunteer, AppError> {
    state
        .volunteer_repo
        .fetch_volunteer(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("volunteer {}", id)))
}

/// Top volunteers by reward points, ranked from 1.
pub async fn leaderboard(
    state: &AppState,
    query: &LeaderboardQuery,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .clamp(1, MAX_LEADERBOARD_SIZE);
    let volunteers = state.volunteer_repo.top_by_points(limit).await?;
    Ok(volunteers
        .into_iter()
        .enumerate()
        .map(|(index, volunteer)| LeaderboardEntry {
            rank: index + 1,
            volunteer_id: volunteer.id,
            level: level_for(volunteer.reward_points),
            name: volunteer.name,
            reward_points: volunteer.reward_points,
            waste_collected: volunteer.waste_collected,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::ports::VolunteerRepository;

    use crate::test_support::{seed_volunteer, TestHarness};

    #[tokio::test]
    async fn ranks_by_points_and_clamps_limit() {
        let harness = TestHarness::new().await;
        let ana = seed_volunteer(&harness, "ana@shore.test").await;
        let ben = seed_volunteer(&harness, "ben@shore.test").await;
        let cy = seed_volunteer(&harness, "cy@shore.test").await;
        for (id, weight, points) in [(ana, 1.0, 40), (ben, 3.0, 250), (cy, 2.0, 40)] {
            harness
                .store
                .credit_collection(id, weight, points)
                .await
                .expect("credit");
        }

        let board = leaderboard(&harness.state, &LeaderboardQuery::default())
            .await
            .expect("board");
        let order: Vec<(usize, VolunteerId, u64)> =
            board.iter().map(|entry| (entry.rank, entry.volunteer_id, entry.level)).collect();
        assert_eq!(order, vec![(1, ben, 3), (2, cy, 1), (3, ana, 1)]);

        let one = leaderboard(&harness.state, &LeaderboardQuery { limit: Some(0) })
            .await
            .expect("clamped");
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].volunteer_id, ben);
    }

    #[tokio::test]
    async fn unknown_volunteer_is_not_found() {
        let harness = TestHarness::new().await;
        let err = get_volunteer(&harness.state, VolunteerId::new())
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
