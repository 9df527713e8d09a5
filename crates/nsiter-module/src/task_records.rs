//! Records written by the kernel-side task iterator programs.
//!
//! All PID/TID fields are C `int` (`pid_t`), native byte order. Name fields
//! are fixed-width `char` arrays carrying one terminating zero byte but no
//! zero padding behind it.

use nsiter_core::name::decode_name;
use nsiter_core::pid::RawPid;
use nsiter_core::record::{read_array, read_i32, Record, RecordRef};

/// `TASK_COMM_LEN` from `include/linux/sched.h`.
pub const TASK_COMM_LEN: usize = 16;

/// Longest kthread "full name", including the terminating zero byte
/// (`fs/proc/array.c`).
pub const TASK_FULL_NAME_LEN: usize = 64;

// Field offsets matching the C struct layouts of the iterator programs.
mod offsets {
    pub mod task_tid {
        pub const ROOT_TID: usize = 0;
        pub const TID: usize = 4;
        pub const SIZE: usize = 8;
    }

    pub mod task_status {
        use super::super::TASK_FULL_NAME_LEN;

        pub const PID: usize = 0;
        pub const TID: usize = 4;
        pub const PPID: usize = 8;
        pub const FULLNAME: usize = 12;
        pub const SIZE: usize = FULLNAME + TASK_FULL_NAME_LEN;
    }

    pub mod task_info {
        use super::super::TASK_COMM_LEN;

        pub const PID: usize = 0;
        pub const TID: usize = 4;
        pub const FULLNAME: usize = 8;
        pub const CALLERNAME: usize = FULLNAME + TASK_COMM_LEN;
        pub const SIZE: usize = CALLERNAME + TASK_COMM_LEN;
    }

    pub mod task_ns_info {
        use super::super::TASK_COMM_LEN;

        pub const PID: usize = 0;
        pub const LOCAL_PID: usize = 4;
        pub const TID: usize = 8;
        pub const LOCAL_TID: usize = 12;
        pub const FULLNAME: usize = 16;
        pub const CALLERNAME: usize = FULLNAME + TASK_COMM_LEN;
        pub const SIZE: usize = CALLERNAME + TASK_COMM_LEN;
    }
}

/// A task's TID as seen from the initial PID namespace and from the PID
/// namespace of the reading process.
///
/// ```text
/// struct info {
///     int root_tid;
///     int tid;   // 0 if the task isn't visible from the reader's namespace
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTid {
    pub root_tid: RawPid,
    pub tid: RawPid,
}

impl TaskTid {
    /// TID in the reader's PID namespace, straight from a shared buffer.
    #[inline]
    pub fn tid_of(rec: &RecordRef<'_, TaskTid>) -> RawPid {
        rec.read_i32(offsets::task_tid::TID)
    }

    /// TID in the initial PID namespace, straight from a shared buffer.
    #[inline]
    pub fn root_tid_of(rec: &RecordRef<'_, TaskTid>) -> RawPid {
        rec.read_i32(offsets::task_tid::ROOT_TID)
    }

    /// Kernel-side encoding, e.g. for building replay dumps.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut raw = [0u8; offsets::task_tid::SIZE];
        raw[offsets::task_tid::ROOT_TID..][..4].copy_from_slice(&self.root_tid.to_ne_bytes());
        raw[offsets::task_tid::TID..][..4].copy_from_slice(&self.tid.to_ne_bytes());
        raw
    }
}

impl Record for TaskTid {
    const SIZE: usize = offsets::task_tid::SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            root_tid: read_i32(bytes, offsets::task_tid::ROOT_TID),
            tid: read_i32(bytes, offsets::task_tid::TID),
        }
    }
}

/// Per-task status including the kthread "full name".
///
/// ```text
/// struct task_status {
///     int  pid;
///     int  tid;
///     int  ppid;
///     char fullname[64];
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub pid: RawPid,
    pub tid: RawPid,
    pub ppid: RawPid,
    pub fullname: [u8; TASK_FULL_NAME_LEN],
}

impl TaskStatus {
    /// Task name; kthreads report their full name of up to 63 chars.
    pub fn name(&self) -> String {
        decode_name(&self.fullname)
    }

    /// Kernel threads are children of kthreadd, PID 2.
    pub fn is_kthread(&self) -> bool {
        self.ppid == 2 || self.pid == 2
    }
}

impl Record for TaskStatus {
    const SIZE: usize = offsets::task_status::SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            pid: read_i32(bytes, offsets::task_status::PID),
            tid: read_i32(bytes, offsets::task_status::TID),
            ppid: read_i32(bytes, offsets::task_status::PPID),
            fullname: read_array(bytes, offsets::task_status::FULLNAME),
        }
    }
}

/// Per-task PID/TID plus the `comm` names of the task and of the task
/// reading the iterator.
///
/// ```text
/// struct task_info {
///     int  pid;
///     int  tid;
///     char fullname[16];
///     char callername[16];
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub pid: RawPid,
    pub tid: RawPid,
    pub fullname: [u8; TASK_COMM_LEN],
    pub callername: [u8; TASK_COMM_LEN],
}

impl TaskInfo {
    pub fn name(&self) -> String {
        decode_name(&self.fullname)
    }

    pub fn caller_name(&self) -> String {
        decode_name(&self.callername)
    }
}

impl Record for TaskInfo {
    const SIZE: usize = offsets::task_info::SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            pid: read_i32(bytes, offsets::task_info::PID),
            tid: read_i32(bytes, offsets::task_info::TID),
            fullname: read_array(bytes, offsets::task_info::FULLNAME),
            callername: read_array(bytes, offsets::task_info::CALLERNAME),
        }
    }
}

/// Like [`TaskInfo`], but carrying both the initial PID namespace numbers
/// and those seen from the reader's PID namespace.
///
/// ```text
/// struct task_info {
///     int  pid;        // initial PID namespace
///     int  local_pid;  // 0 if not visible to the reader
///     int  tid;        // initial PID namespace
///     int  local_tid;  // 0 if not visible to the reader
///     char fullname[16];
///     char callername[16];
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNsInfo {
    pub pid: RawPid,
    pub local_pid: RawPid,
    pub tid: RawPid,
    pub local_tid: RawPid,
    pub fullname: [u8; TASK_COMM_LEN],
    pub callername: [u8; TASK_COMM_LEN],
}

impl TaskNsInfo {
    pub fn name(&self) -> String {
        decode_name(&self.fullname)
    }

    pub fn caller_name(&self) -> String {
        decode_name(&self.callername)
    }

    /// Whether the task shows up in the reader's PID namespace at all.
    pub fn is_visible(&self) -> bool {
        self.local_tid > 0
    }
}

impl Record for TaskNsInfo {
    const SIZE: usize = offsets::task_ns_info::SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            pid: read_i32(bytes, offsets::task_ns_info::PID),
            local_pid: read_i32(bytes, offsets::task_ns_info::LOCAL_PID),
            tid: read_i32(bytes, offsets::task_ns_info::TID),
            local_tid: read_i32(bytes, offsets::task_ns_info::LOCAL_TID),
            fullname: read_array(bytes, offsets::task_ns_info::FULLNAME),
            callername: read_array(bytes, offsets::task_ns_info::CALLERNAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedSource;
    use nsiter_core::iter::{records, volatile_records};

    fn name_field<const N: usize>(name: &[u8], filler: u8) -> [u8; N] {
        let mut f = [filler; N];
        f[..name.len()].copy_from_slice(name);
        f
    }

    fn task_status_bytes(pid: i32, tid: i32, ppid: i32, name: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&pid.to_ne_bytes());
        v.extend_from_slice(&tid.to_ne_bytes());
        v.extend_from_slice(&ppid.to_ne_bytes());
        v.extend_from_slice(&name_field::<TASK_FULL_NAME_LEN>(name, b'#'));
        v
    }

    fn task_info_bytes(pid: i32, tid: i32, name: &[u8], caller: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&pid.to_ne_bytes());
        v.extend_from_slice(&tid.to_ne_bytes());
        v.extend_from_slice(&name_field::<TASK_COMM_LEN>(name, b'#'));
        v.extend_from_slice(&name_field::<TASK_COMM_LEN>(caller, 0));
        v
    }

    #[test]
    fn test_sizes_match_c_layout() {
        assert_eq!(TaskTid::SIZE, 8);
        assert_eq!(TaskStatus::SIZE, 76);
        assert_eq!(TaskInfo::SIZE, 40);
        assert_eq!(TaskNsInfo::SIZE, 48);
    }

    #[test]
    fn test_task_tid_bytes() {
        let t = TaskTid { root_tid: 4711, tid: 1 };
        assert_eq!(TaskTid::decode(&t.to_bytes()), t);
    }

    #[test]
    fn test_task_tid_volatile_accessors() {
        let mut src = ScriptedSource::new().record(TaskTid { root_tid: 741, tid: 555 }.to_bytes());
        let mut it = volatile_records::<_, TaskTid>(&mut src);
        let rec = it.next().unwrap().unwrap();
        assert_eq!(TaskTid::tid_of(&rec), 555);
        assert_eq!(TaskTid::root_tid_of(&rec), 741);
    }

    #[test]
    fn test_task_status_full_kthread_name() {
        let name = b"kworker/u16:3-events_unbound\0";
        let mut src = ScriptedSource::from_dump(
            [task_status_bytes(42, 42, 2, name), task_status_bytes(1, 1, 0, b"init\0")].concat(),
        );
        let all: Vec<TaskStatus> = records::<_, TaskStatus>(&mut src).map(|r| r.unwrap()).collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name(), "kworker/u16:3-events_unbound");
        assert!(all[0].name().len() > TASK_COMM_LEN - 1);
        assert!(all[0].is_kthread());
        assert_eq!(all[1].name(), "init");
        assert!(!all[1].is_kthread());
    }

    #[test]
    fn test_task_status_unterminated_name() {
        let bytes = task_status_bytes(7, 8, 1, &[b'x'; TASK_FULL_NAME_LEN]);
        let ts = TaskStatus::decode(&bytes);
        assert_eq!(ts.name().len(), TASK_FULL_NAME_LEN);
        assert_eq!((ts.pid, ts.tid, ts.ppid), (7, 8, 1));
    }

    #[test]
    fn test_task_info_names() {
        let bytes = task_info_bytes(100, 101, b"bash\0", b"pidlister\0");
        let ti = TaskInfo::decode(&bytes);
        assert_eq!((ti.pid, ti.tid), (100, 101));
        assert_eq!(ti.name(), "bash");
        assert_eq!(ti.caller_name(), "pidlister");
    }

    #[test]
    fn test_task_ns_info_local_and_root_numbers() {
        let mut host = Vec::new();
        for v in [4711i32, 0, 4712, 0] {
            host.extend_from_slice(&v.to_ne_bytes());
        }
        host.extend_from_slice(&name_field::<TASK_COMM_LEN>(b"sshd\0", b'#'));
        host.extend_from_slice(&name_field::<TASK_COMM_LEN>(b"pidlister\0", 0));

        let mut own = Vec::new();
        for v in [9000i32, 1, 9001, 2] {
            own.extend_from_slice(&v.to_ne_bytes());
        }
        own.extend_from_slice(&name_field::<TASK_COMM_LEN>(b"sleep\0", 0));
        own.extend_from_slice(&name_field::<TASK_COMM_LEN>(b"pidlister\0", 0));

        let mut src = ScriptedSource::new().record(host).record(own);
        let all: Vec<TaskNsInfo> = records::<_, TaskNsInfo>(&mut src).map(|r| r.unwrap()).collect();
        assert_eq!(all.len(), 2);

        assert!(!all[0].is_visible());
        assert_eq!((all[0].pid, all[0].tid), (4711, 4712));
        assert_eq!(all[0].name(), "sshd");

        assert!(all[1].is_visible());
        assert_eq!((all[1].local_pid, all[1].local_tid), (1, 2));
        assert_eq!((all[1].pid, all[1].tid), (9000, 9001));
        assert_eq!(all[1].caller_name(), "pidlister");
    }
}
