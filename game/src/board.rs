//! The board: sole owner of tiles, bombs, fires and pawns, and the
//! explosion/fire state machine that ties them together.
//!
//! Everything happens synchronously on the caller's thread. A command or a
//! timer expiry runs to completion, including any chain reaction it sets
//! off, before the next one is looked at. Chains are resolved depth-first:
//! a bomb is removed from the map before its blast is walked and a fire is
//! registered before the bomb under it is set off, so no coordinate is
//! processed twice within one cascade.

use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::event::{BoardEvent, EventBus};
use crate::grid::{Coord, Direction, Grid, TileKind};
use crate::pawn::{Pawn, PawnId};
use crate::timer::{TimerEvent, TimerId, TimerQueue, TimerService};

/// A live bomb. Gone from the board once detonated.
#[derive(Debug)]
pub struct Bomb {
    coord: Coord,
    timer: TimerId,
    blast_radius: u32,
    owner: Option<PawnId>,
    watchers: Vec<oneshot::Sender<()>>,
}

impl Bomb {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn blast_radius(&self) -> u32 {
        self.blast_radius
    }

    pub fn owner(&self) -> Option<PawnId> {
        self.owner
    }
}

/// A burning tile. Gone from the board once extinguished.
#[derive(Debug)]
pub struct Fire {
    coord: Coord,
    timer: TimerId,
    watchers: Vec<oneshot::Sender<()>>,
}

impl Fire {
    pub fn coord(&self) -> Coord {
        self.coord
    }
}

fn notify(watchers: Vec<oneshot::Sender<()>>) {
    for tx in watchers {
        // observers may have stopped listening
        let _ = tx.send(());
    }
}

pub struct Board<T: TimerService = TimerQueue> {
    grid: Grid,
    bombs: HashMap<Coord, Bomb>,
    fires: HashMap<Coord, Fire>,
    pawns: BTreeMap<PawnId, Pawn>,
    next_pawn_id: u32,
    config: GameConfig,
    timers: T,
    events: EventBus,
}

impl Board {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::with_timers(config, TimerQueue::new())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimerService> Board<T> {
    pub fn with_timers(config: GameConfig, timers: T) -> Self {
        Self {
            grid: Grid::default(),
            bombs: HashMap::new(),
            fires: HashMap::new(),
            pawns: BTreeMap::new(),
            next_pawn_id: 1,
            config,
            timers,
            events: EventBus::default(),
        }
    }

    /// Lays out a fresh `width × height` arena. Only the tile layer is
    /// replaced; call this once, before play begins.
    pub fn generate(&mut self, width: u32, height: u32) {
        self.grid = Grid::generate(width, height);
        info!("Generated {}x{} board", width, height);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fire duration used when a bomb ignites a tile.
    pub fn default_burn(&self) -> Duration {
        self.config.burn
    }

    pub fn set_default_burn(&mut self, burn: Duration) {
        self.config.burn = burn;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Foreground tile at `coord`.
    pub fn fg_tile(&self, coord: Coord) -> Result<TileKind> {
        self.grid.get(coord).ok_or(GameError::NotFound(coord))
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Coord, TileKind)> + '_ {
        self.grid.iter()
    }

    pub fn bomb(&self, coord: Coord) -> Option<&Bomb> {
        self.bombs.get(&coord)
    }

    pub fn has_bomb(&self, coord: Coord) -> bool {
        self.bombs.contains_key(&coord)
    }

    pub fn bombs(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.values()
    }

    pub fn is_burning(&self, coord: Coord) -> bool {
        self.fires.contains_key(&coord)
    }

    pub fn fires(&self) -> impl Iterator<Item = &Fire> {
        self.fires.values()
    }

    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(&id)
    }

    pub(crate) fn pawn_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.get_mut(&id)
    }

    /// Pawns in insertion order.
    pub fn pawns(&self) -> impl Iterator<Item = (PawnId, &Pawn)> {
        self.pawns.iter().map(|(id, pawn)| (*id, pawn))
    }

    /// Pawns standing on `coord`, dead or alive.
    pub fn pawns_at(&self, coord: Coord) -> impl Iterator<Item = (PawnId, &Pawn)> {
        self.pawns()
            .filter(move |(_, pawn)| pawn.location() == Some(coord))
    }

    /// Registers an external observer of everything that happens on the board.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<BoardEvent> {
        self.events.subscribe()
    }

    fn publish(&mut self, event: BoardEvent) {
        if let BoardEvent::BombDetonated {
            owner: Some(owner), ..
        } = event
        {
            if let Some(pawn) = self.pawns.get_mut(&owner) {
                pawn.return_bomb();
            }
        }
        self.events.publish(&event);
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Moves the clock forward by `dt`, running every expiry that falls due.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.timers.now() + dt;
        self.advance_to(until);
    }

    /// Runs every expiry due at or before `until`, one at a time and in
    /// deadline order, then leaves the clock at `until`.
    pub fn advance_to(&mut self, until: Duration) {
        while let Some(event) = self.timers.expire(until) {
            match event {
                TimerEvent::Detonate(coord) => {
                    self.detonate(coord);
                }
                TimerEvent::Extinguish(coord) => {
                    self.stop_fire(coord);
                }
            }
        }
    }

    /// Places an ownerless bomb at `coord` that detonates after `fuse`.
    ///
    /// The returned receiver resolves when the bomb detonates, whatever the
    /// cause.
    pub fn drop_bomb(
        &mut self,
        coord: Coord,
        fuse: Duration,
        blast_radius: u32,
    ) -> Result<oneshot::Receiver<()>> {
        self.place_bomb(coord, fuse, blast_radius, None)
    }

    pub(crate) fn place_bomb(
        &mut self,
        coord: Coord,
        fuse: Duration,
        blast_radius: u32,
        owner: Option<PawnId>,
    ) -> Result<oneshot::Receiver<()>> {
        if !self.grid.contains(coord) {
            return Err(GameError::NotFound(coord));
        }
        if self.bombs.contains_key(&coord) {
            return Err(GameError::Occupied(coord));
        }

        let (tx, rx) = oneshot::channel();
        let timer = self.timers.schedule(fuse, TimerEvent::Detonate(coord));
        self.bombs.insert(
            coord,
            Bomb {
                coord,
                timer,
                blast_radius,
                owner,
                watchers: vec![tx],
            },
        );
        debug!("Bomb armed at {} ({:?} fuse, radius {})", coord, fuse, blast_radius);
        self.publish(BoardEvent::BombDropped { coord, owner });
        Ok(rx)
    }

    /// Sets off the bomb at `coord`. Does nothing and returns `false` when
    /// there is no bomb there, which covers a fuse expiring after the bomb
    /// was already set off by something else.
    pub fn detonate(&mut self, coord: Coord) -> bool {
        let Some(bomb) = self.bombs.remove(&coord) else {
            return false;
        };
        self.timers.cancel(bomb.timer);
        notify(bomb.watchers);
        debug!("Bomb detonated at {}", coord);
        self.publish(BoardEvent::BombDetonated {
            coord,
            owner: bomb.owner,
        });

        self.ignite(coord);

        let mut open = Direction::ALL.to_vec();
        for step in 1..=bomb.blast_radius as i32 {
            if open.is_empty() {
                break;
            }
            open.retain(|&direction| {
                let target = coord.offset(direction, step);
                let blocked = match self.grid.get(target) {
                    None | Some(TileKind::Hard) => return false,
                    Some(TileKind::Soft) => true,
                    Some(TileKind::Empty) => self.bombs.contains_key(&target),
                };
                self.ignite(target);
                !blocked
            });
        }
        true
    }

    fn ignite(&mut self, coord: Coord) {
        let burn = self.config.burn;
        // watchers of bomb-started fires are never observed
        let _ = self.start_fire(coord, burn);
    }

    /// Sets `coord` burning for `burn`.
    ///
    /// Re-igniting a burning tile restarts its burn at `burn` from now,
    /// even if that is shorter than what was left. A fresh fire clears the
    /// tile, sets off any bomb on it and kills every pawn standing there.
    /// The receiver resolves when the fire goes out.
    pub fn start_fire(&mut self, coord: Coord, burn: Duration) -> Result<oneshot::Receiver<()>> {
        if !self.grid.contains(coord) {
            return Err(GameError::NotFound(coord));
        }
        let (tx, rx) = oneshot::channel();

        if let Some(fire) = self.fires.get_mut(&coord) {
            fire.watchers.push(tx);
            self.timers.reset(fire.timer, burn);
            debug!("Fire at {} extended to {:?}", coord, burn);
            self.publish(BoardEvent::FireExtended { coord });
            return Ok(rx);
        }

        let timer = self.timers.schedule(burn, TimerEvent::Extinguish(coord));
        self.fires.insert(
            coord,
            Fire {
                coord,
                timer,
                watchers: vec![tx],
            },
        );
        debug!("Fire started at {} for {:?}", coord, burn);
        self.publish(BoardEvent::FireStarted { coord });

        if self.grid.set(coord, TileKind::Empty) != Some(TileKind::Empty) {
            self.publish(BoardEvent::TileChanged {
                coord,
                kind: TileKind::Empty,
            });
        }

        self.detonate(coord);

        let victims: Vec<PawnId> = self.pawns_at(coord).map(|(id, _)| id).collect();
        for id in victims {
            self.kill(id);
        }
        Ok(rx)
    }

    /// Puts out the fire at `coord`. The tile stays `Empty`.
    pub fn stop_fire(&mut self, coord: Coord) -> bool {
        let Some(fire) = self.fires.remove(&coord) else {
            return false;
        };
        self.timers.cancel(fire.timer);
        notify(fire.watchers);
        debug!("Fire at {} went out", coord);
        self.publish(BoardEvent::FireStopped { coord });
        true
    }

    /// Puts `pawn` on the board at `coord` and clears a landing zone: the
    /// tile and its four neighbours become `Empty` whatever they were.
    /// Landing on a burning tile is fatal, as with any other move.
    pub fn insert_pawn(&mut self, coord: Coord, mut pawn: Pawn) -> Result<PawnId> {
        if !self.grid.contains(coord) {
            return Err(GameError::NotFound(coord));
        }
        let id = PawnId(self.next_pawn_id);
        self.next_pawn_id += 1;

        for tile in std::iter::once(coord).chain(coord.neighbors()) {
            if let Some(previous) = self.grid.set(tile, TileKind::Empty) {
                if previous != TileKind::Empty {
                    self.publish(BoardEvent::TileChanged {
                        coord: tile,
                        kind: TileKind::Empty,
                    });
                }
            }
        }

        info!("Pawn {} ({}) entered at {}", id, pawn.name(), coord);
        pawn.place(coord);
        self.pawns.insert(id, pawn);
        self.publish(BoardEvent::PawnInserted { pawn: id, coord });

        if self.fires.contains_key(&coord) {
            self.kill(id);
        }
        Ok(id)
    }

    /// Takes a pawn off the board, e.g. when its player disconnects. Bombs it
    /// already placed still go off.
    pub fn remove_pawn(&mut self, id: PawnId) -> Option<Pawn> {
        let pawn = self.pawns.remove(&id)?;
        info!("Pawn {} ({}) left", id, pawn.name());
        self.publish(BoardEvent::PawnRemoved { pawn: id });
        Some(pawn)
    }

    /// Records that a pawn now stands on `coord`. Every change of location
    /// goes through here; stepping onto a burning tile is fatal.
    pub fn pawn_moved(&mut self, id: PawnId, coord: Coord) -> Result<()> {
        let pawn = self.pawns.get_mut(&id).ok_or(GameError::UnknownPawn(id))?;
        pawn.place(coord);
        self.publish(BoardEvent::PawnMoved { pawn: id, coord });

        if self.fires.contains_key(&coord) {
            self.kill(id);
        }
        Ok(())
    }

    /// Kills a pawn. Returns `true` only for the call that actually killed it.
    pub fn kill(&mut self, id: PawnId) -> bool {
        let Some(pawn) = self.pawns.get_mut(&id) else {
            return false;
        };
        if !pawn.kill() {
            return false;
        }
        let coord = pawn.location().unwrap_or_default();
        info!("Pawn {} ({}) died at {}", id, pawn.name(), coord);
        self.publish(BoardEvent::PawnKilled { pawn: id, coord });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_ok, task};

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn burning(board: &Board) -> Vec<Coord> {
        let mut fires: Vec<Coord> = board.fires().map(Fire::coord).collect();
        fires.sort();
        fires
    }

    fn clear(board: &mut Board, coords: &[Coord]) {
        for coord in coords {
            board.grid.set(*coord, TileKind::Empty);
        }
    }

    #[test]
    fn test_fg_tile() {
        let mut board = Board::new();
        board.generate(3, 3);
        assert_eq!(board.fg_tile(c(0, 0)), Ok(TileKind::Soft));
        assert_eq!(board.fg_tile(c(1, 1)), Ok(TileKind::Hard));
        assert_eq!(board.fg_tile(c(3, 0)), Err(GameError::NotFound(c(3, 0))));
    }

    #[test]
    fn test_bomb_timing() {
        let mut board = Board::new();
        board.generate(1, 1);
        let mut detonated = task::spawn(board.drop_bomb(c(0, 0), secs(10), 1).unwrap());

        board.advance(secs(9));
        assert!(board.has_bomb(c(0, 0)));
        assert_pending!(detonated.poll());

        board.advance(secs(1));
        assert!(!board.has_bomb(c(0, 0)));
        assert_ready_ok!(detonated.poll());
        assert!(board.is_burning(c(0, 0)));
    }

    #[test]
    fn test_drop_bomb_on_occupied_tile() {
        let mut board = Board::new();
        board.generate(3, 3);
        board.drop_bomb(c(0, 0), secs(1), 1).unwrap();
        assert_eq!(
            board.drop_bomb(c(0, 0), secs(5), 2).unwrap_err(),
            GameError::Occupied(c(0, 0))
        );
        assert_eq!(board.bombs().count(), 1);
        assert_eq!(board.bomb(c(0, 0)).unwrap().blast_radius(), 1);
    }

    #[test]
    fn test_drop_bomb_off_board() {
        let mut board = Board::new();
        board.generate(3, 3);
        assert_eq!(
            board.drop_bomb(c(-1, 0), secs(1), 1).unwrap_err(),
            GameError::NotFound(c(-1, 0))
        );
    }

    #[test]
    fn test_detonate_without_bomb_is_noop() {
        let mut board = Board::new();
        board.generate(3, 3);
        assert!(!board.detonate(c(0, 0)));
        assert!(board.fires().next().is_none());
    }

    #[test]
    fn test_fire_extension_resets_duration() {
        let mut board = Board::new();
        board.generate(3, 3);
        let mut first = task::spawn(board.start_fire(c(0, 0), secs(3)).unwrap());

        board.advance(secs(2));
        let mut second = task::spawn(board.start_fire(c(0, 0), secs(5)).unwrap());

        board.advance(secs(2));
        assert!(board.is_burning(c(0, 0)));
        assert_pending!(first.poll());

        board.advance(secs(2));
        assert!(board.is_burning(c(0, 0)));

        board.advance(secs(1));
        assert!(!board.is_burning(c(0, 0)));
        assert_ready_ok!(first.poll());
        assert_ready_ok!(second.poll());
        assert_eq!(board.timers().pending(), 0);
    }

    #[test]
    fn test_fire_extension_can_shorten() {
        let mut board = Board::new();
        board.generate(3, 3);
        board.start_fire(c(0, 0), secs(10)).unwrap();
        board.advance(secs(1));
        board.start_fire(c(0, 0), secs(1)).unwrap();
        board.advance(secs(1));
        assert!(!board.is_burning(c(0, 0)));
    }

    #[test]
    fn test_fire_clears_tile() {
        let mut board = Board::new();
        board.generate(3, 3);
        board.start_fire(c(2, 0), secs(1)).unwrap();
        assert_eq!(board.fg_tile(c(2, 0)), Ok(TileKind::Empty));
        board.advance(secs(1));
        assert!(!board.is_burning(c(2, 0)));
        assert_eq!(board.fg_tile(c(2, 0)), Ok(TileKind::Empty));
    }

    #[test]
    fn test_stop_fire_without_fire_is_noop() {
        let mut board = Board::new();
        board.generate(3, 3);
        assert!(!board.stop_fire(c(0, 0)));
    }

    #[test]
    fn test_explosion_obstruction() {
        let mut board = Board::new();
        board.generate(5, 5);
        clear(&mut board, &[c(2, 1)]);

        board.drop_bomb(c(2, 1), secs(1), 4).unwrap();
        board.advance(secs(1));

        // pillars at (1,1) and (3,1) stop the sideways blast outright; the
        // soft blocks above and below burn and stop it
        assert_eq!(burning(&board), vec![c(2, 0), c(2, 1), c(2, 2)]);
        assert_eq!(board.fg_tile(c(2, 0)), Ok(TileKind::Empty));
        assert_eq!(board.fg_tile(c(2, 2)), Ok(TileKind::Empty));
        assert_eq!(board.fg_tile(c(2, 3)), Ok(TileKind::Soft));
        assert_eq!(board.fg_tile(c(1, 1)), Ok(TileKind::Hard));
    }

    #[test]
    fn test_explosion_reaches_radius_on_open_ground() {
        let mut board = Board::new();
        board.generate(7, 1);
        clear(&mut board, &[c(0, 0), c(1, 0), c(2, 0), c(3, 0), c(4, 0), c(5, 0), c(6, 0)]);

        board.drop_bomb(c(3, 0), secs(1), 2).unwrap();
        board.advance(secs(1));
        assert_eq!(
            burning(&board),
            vec![c(1, 0), c(2, 0), c(3, 0), c(4, 0), c(5, 0)]
        );
    }

    #[test]
    fn test_chain_detonation() {
        let mut board = Board::new();
        board.generate(5, 1);
        clear(&mut board, &[c(0, 0), c(1, 0), c(2, 0)]);

        let mut slow = task::spawn(board.drop_bomb(c(0, 0), secs(10), 1).unwrap());
        board.drop_bomb(c(1, 0), secs(1), 1).unwrap();

        board.advance(secs(1));
        assert!(!board.has_bomb(c(0, 0)));
        assert!(!board.has_bomb(c(1, 0)));
        assert_ready_ok!(slow.poll());
        assert_eq!(burning(&board), vec![c(0, 0), c(1, 0), c(2, 0)]);

        // the chained bomb's own fuse was cancelled
        board.advance(secs(20));
        assert!(board.fires().next().is_none());
        assert_eq!(board.timers().pending(), 0);
    }

    #[test]
    fn test_bomb_obstructs_blast_beyond_it() {
        let mut board = Board::new();
        board.generate(6, 1);
        clear(&mut board, &[c(0, 0), c(1, 0), c(2, 0), c(3, 0), c(4, 0), c(5, 0)]);

        board.drop_bomb(c(0, 0), secs(1), 4).unwrap();
        board.drop_bomb(c(1, 0), secs(10), 1).unwrap();
        board.advance(secs(1));

        // the first blast stops at the second bomb, whose own radius is 1
        assert_eq!(burning(&board), vec![c(0, 0), c(1, 0), c(2, 0)]);
    }

    #[test]
    fn test_fire_ignites_bomb() {
        let mut board = Board::new();
        board.generate(3, 1);
        clear(&mut board, &[c(0, 0), c(1, 0), c(2, 0)]);

        let mut detonated = task::spawn(board.drop_bomb(c(2, 0), secs(10), 1).unwrap());
        board.start_fire(c(2, 0), secs(5)).unwrap();

        assert!(!board.has_bomb(c(2, 0)));
        assert_ready_ok!(detonated.poll());
        assert!(board.is_burning(c(1, 0)));
    }

    #[test]
    fn test_fire_kills_pawns_on_tile() {
        let mut board = Board::new();
        board.generate(5, 5);
        let a = board.insert_pawn(c(0, 0), Pawn::new("a")).unwrap();
        let b = board.insert_pawn(c(0, 0), Pawn::new("b")).unwrap();
        let survivor = board.insert_pawn(c(4, 4), Pawn::new("c")).unwrap();

        board.start_fire(c(0, 0), secs(1)).unwrap();
        assert!(!board.pawn(a).unwrap().is_alive());
        assert!(!board.pawn(b).unwrap().is_alive());
        assert!(board.pawn(survivor).unwrap().is_alive());
    }

    #[test]
    fn test_moving_onto_fire_kills() {
        let mut board = Board::new();
        board.generate(5, 5);
        let id = board.insert_pawn(c(0, 0), Pawn::new("a")).unwrap();
        board.start_fire(c(1, 0), secs(3)).unwrap();

        board.move_pawn(id, Direction::Right).unwrap();
        let pawn = board.pawn(id).unwrap();
        assert!(!pawn.is_alive());
        assert_eq!(pawn.location(), Some(c(1, 0)));
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut board = Board::new();
        board.generate(3, 3);
        let id = board.insert_pawn(c(0, 0), Pawn::new("a")).unwrap();
        let mut events = board.subscribe();

        assert!(board.kill(id));
        assert!(!board.kill(id));
        assert_eq!(
            events.try_recv().unwrap(),
            BoardEvent::PawnKilled { pawn: id, coord: c(0, 0) }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_insert_pawn_clears_landing_zone() {
        let mut board = Board::new();
        board.generate(5, 5);
        let id = board.insert_pawn(c(1, 1), Pawn::new("a")).unwrap();

        for coord in [c(1, 1), c(1, 0), c(1, 2), c(0, 1), c(2, 1)] {
            assert_eq!(board.fg_tile(coord), Ok(TileKind::Empty), "{}", coord);
        }
        assert_eq!(board.fg_tile(c(0, 0)), Ok(TileKind::Soft));
        assert_eq!(board.fg_tile(c(3, 3)), Ok(TileKind::Hard));
        assert_eq!(board.pawn(id).unwrap().location(), Some(c(1, 1)));
        assert_eq!(board.pawns().count(), 1);
    }

    #[test]
    fn test_insert_pawn_onto_fire() {
        let mut board = Board::new();
        board.generate(3, 3);
        board.start_fire(c(0, 0), secs(5)).unwrap();
        let mut events = board.subscribe();

        let id = board.insert_pawn(c(0, 0), Pawn::new("a")).unwrap();
        assert!(!board.pawn(id).unwrap().is_alive());
        assert_eq!(
            events.try_recv().unwrap(),
            BoardEvent::TileChanged { coord: c(0, 1), kind: TileKind::Empty }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            BoardEvent::TileChanged { coord: c(1, 0), kind: TileKind::Empty }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            BoardEvent::PawnInserted { pawn: id, coord: c(0, 0) }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            BoardEvent::PawnKilled { pawn: id, coord: c(0, 0) }
        );

        // a dead pawn cannot leave a bomb sitting in the fire
        assert_eq!(board.drop_pawn_bomb(id).unwrap_err(), GameError::Dead);
        assert!(!board.has_bomb(c(0, 0)));
    }

    #[test]
    fn test_insert_pawn_off_board() {
        let mut board = Board::new();
        board.generate(2, 2);
        assert_eq!(
            board.insert_pawn(c(5, 5), Pawn::new("a")),
            Err(GameError::NotFound(c(5, 5)))
        );
        assert_eq!(board.pawns().count(), 0);
    }

    #[test]
    fn test_remove_pawn_keeps_its_bombs() {
        let mut board = Board::new();
        board.generate(5, 5);
        let id = board.insert_pawn(c(0, 0), Pawn::new("a")).unwrap();
        board.drop_pawn_bomb(id).unwrap();

        let pawn = board.remove_pawn(id).unwrap();
        assert_eq!(pawn.name(), "a");
        assert!(board.remove_pawn(id).is_none());

        board.advance(secs(2));
        assert!(!board.has_bomb(c(0, 0)));
        assert!(board.is_burning(c(0, 0)));
    }

    #[test]
    fn test_capacity_restored_once_under_chain() {
        let mut board = Board::new();
        board.generate(5, 1);
        let id = board
            .insert_pawn(c(0, 0), Pawn::new("a").with_bomb_capacity(2))
            .unwrap();
        clear(&mut board, &[c(2, 0)]);

        board.drop_pawn_bomb(id).unwrap();
        board.move_pawn(id, Direction::Right).unwrap();
        board.drop_pawn_bomb(id).unwrap();
        assert_eq!(board.pawn(id).unwrap().bomb_capacity(), 0);

        // both go off when the first fuse expires: one via fuse, one via chain
        board.advance(secs(2));
        assert_eq!(board.bombs().count(), 0);
        assert_eq!(board.pawn(id).unwrap().bomb_capacity(), 2);

        board.advance(secs(10));
        assert_eq!(board.pawn(id).unwrap().bomb_capacity(), 2);
    }

    #[test]
    fn test_events_follow_detonation_order() {
        let mut board = Board::new();
        board.generate(3, 1);
        clear(&mut board, &[c(0, 0), c(1, 0)]);
        let mut events = board.subscribe();

        board.drop_bomb(c(0, 0), secs(1), 2).unwrap();
        board.advance(secs(1));

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                BoardEvent::BombDropped { coord: c(0, 0), owner: None },
                BoardEvent::BombDetonated { coord: c(0, 0), owner: None },
                BoardEvent::FireStarted { coord: c(0, 0) },
                BoardEvent::FireStarted { coord: c(1, 0) },
                BoardEvent::FireStarted { coord: c(2, 0) },
                BoardEvent::TileChanged { coord: c(2, 0), kind: TileKind::Empty },
            ]
        );
    }
}
