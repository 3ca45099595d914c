//! UseCase 層
//!
//! 接続ごとのイベントディスパッチを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod router;

pub use router::EventRouter;
