#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::net::{IpAddr, SocketAddr};
    use std::rc::Rc;
    use std::time::Duration;

    use chrono::NaiveDateTime;
    use num_complex::Complex;
    use url::Url;

    use crate::error::BoxError;
    use crate::set::FlagSet;
    use crate::value::{Getter, Handle, Value};
    use crate::values;

    pub const TIME_LAYOUT: &str = "%Y-%m-%d";

    /// Counts how many times it was given; the first occurrence discards the
    /// default.
    pub struct Counter {
        value: Handle<i64>,
        written: bool,
    }

    impl Counter {
        pub fn new(default: i64) -> Self {
            Counter {
                value: Handle::new(default),
                written: false,
            }
        }
    }

    impl Value for Counter {
        fn set(&mut self, _raw: &str) -> Result<(), BoxError> {
            let mut value = self.value.borrow_mut();
            if !self.written {
                *value = 0;
                self.written = true;
            }
            *value += 1;
            Ok(())
        }

        fn render(&self) -> String {
            self.value.get().to_string()
        }

        fn is_bool_flag(&self) -> bool {
            true
        }
    }

    impl Getter for Counter {
        type Target = i64;

        fn handle(&self) -> Handle<i64> {
            self.value.clone()
        }
    }

    pub const READ: u8 = 1;
    pub const WRITE: u8 = 2;

    /// A permission set written as any mix of `r` and `w`.
    pub struct FileMode(Handle<u8>);

    impl FileMode {
        pub fn new(default: u8) -> Self {
            FileMode(Handle::new(default))
        }
    }

    impl Value for FileMode {
        fn set(&mut self, raw: &str) -> Result<(), BoxError> {
            let mut mode = self.0.borrow_mut();
            for c in raw.chars() {
                match c {
                    'r' => *mode |= READ,
                    'w' => *mode |= WRITE,
                    _ => return Err(format!("invalid file mode {raw:?}").into()),
                }
            }
            Ok(())
        }

        fn render(&self) -> String {
            let mode = self.0.get();
            let mut out = String::new();
            if mode & READ != 0 {
                out.push('r');
            }
            if mode & WRITE != 0 {
                out.push('w');
            }
            out
        }
    }

    impl Getter for FileMode {
        type Target = u8;

        fn handle(&self) -> Handle<u8> {
            self.0.clone()
        }
    }

    /// One flag of every stock type, named after its constructor.
    pub struct AllFlags {
        pub int: Handle<isize>,
        pub ints: Handle<Vec<isize>>,
        pub int8: Handle<i8>,
        pub int64s: Handle<Vec<i64>>,
        pub uint: Handle<usize>,
        pub uint16: Handle<u16>,
        pub uint32s: Handle<Vec<u32>>,
        pub float32: Handle<f32>,
        pub float64s: Handle<Vec<f64>>,
        pub complex128: Handle<Complex<f64>>,
        pub complex64s: Handle<Vec<Complex<f32>>>,
        pub bool: Handle<bool>,
        pub bools: Handle<Vec<bool>>,
        pub string: Handle<String>,
        pub strings: Handle<Vec<String>>,
        pub duration: Handle<Duration>,
        pub durations: Handle<Vec<Duration>>,
        pub time: Handle<NaiveDateTime>,
        pub times: Handle<Vec<NaiveDateTime>>,
        pub url: Handle<Url>,
        pub urls: Handle<Vec<Url>>,
        pub ip_addr: Handle<IpAddr>,
        pub ip_addrs: Handle<Vec<IpAddr>>,
        pub socket_addr: Handle<SocketAddr>,
        pub socket_addrs: Handle<Vec<SocketAddr>>,
    }

    impl AllFlags {
        pub fn declare(set: &mut FlagSet) -> Self {
            AllFlags {
                int: set.add("int", values::int(0), "int"),
                ints: set.add("ints", values::ints(&[]), "ints"),
                int8: set.add("int8", values::int8(0), "int8"),
                int64s: set.add("int64s", values::int64s(&[]), "int64s"),
                uint: set.add("uint", values::uint(0), "uint"),
                uint16: set.add("uint16", values::uint16(0), "uint16"),
                uint32s: set.add("uint32s", values::uint32s(&[]), "uint32s"),
                float32: set.add("float32", values::float32(0.0), "float32"),
                float64s: set.add("float64s", values::float64s(&[]), "float64s"),
                complex128: set.add("complex128", values::complex128(Complex::default()), "complex128"),
                complex64s: set.add("complex64s", values::complex64s(&[]), "complex64s"),
                bool: set.add("bool", values::boolean(false), "bool"),
                bools: set.add("bools", values::booleans(&[]), "bools"),
                string: set.add("string", values::string(""), "string"),
                strings: set.add("strings", values::strings::<&str>(&[]), "strings"),
                duration: set.add("duration", values::duration(Duration::ZERO), "duration"),
                durations: set.add("durations", values::durations(&[]), "durations"),
                time: set.add("time", values::time_str(TIME_LAYOUT, "2000-01-01"), "time"),
                times: set.add("times", values::times_str::<&str>(TIME_LAYOUT, &[]), "times"),
                url: set.add("url", values::url_str("http://localhost/"), "url"),
                urls: set.add("urls", values::urls_str::<&str>(&[]), "urls"),
                ip_addr: set.add("ip_addr", values::ip_addr_str("0.0.0.0"), "ip_addr"),
                ip_addrs: set.add("ip_addrs", values::ip_addrs(&[]), "ip_addrs"),
                socket_addr: set.add("socket_addr", values::socket_addr_str("0.0.0.0:0"), "socket_addr"),
                socket_addrs: set.add("socket_addrs", values::socket_addrs(&[]), "socket_addrs"),
            }
        }
    }

    /// A writer the set can own while the test keeps reading it.
    #[derive(Clone, Default)]
    pub struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Shared {
        pub fn take(&self) -> String {
            String::from_utf8(std::mem::take(&mut *self.0.borrow_mut())).unwrap()
        }
    }

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_stock_type_parses_from_the_command_line() {
        let mut set = FlagSet::default();
        let flags = AllFlags::declare(&mut set);
        set.parse(
            [
                "-int=-1",
                "-ints=1",
                "-ints=0x2",
                "-int8=8",
                "-int64s=64",
                "-uint=1",
                "-uint16=0o20",
                "-uint32s=32",
                "-float32=3.5",
                "-float64s=6.25",
                "-complex128=(1+2i)",
                "-complex64s=3i",
                "-bool",
                "-bools=false",
                "-bools=t",
                "-string=hi",
                "-strings=a",
                "-duration=1m30s",
                "-durations=1s",
                "-time=2021-06-15",
                "-times=2022-01-01",
                "-url=https://example.com/x",
                "-urls=https://a.example/",
                "-ip_addr=::1",
                "-ip_addrs=10.0.0.1",
                "-socket_addr=127.0.0.1:80",
                "-socket_addrs=[::1]:443",
            ],
            &[],
        )
        .unwrap();

        assert_eq!(flags.int.get(), -1);
        assert_eq!(flags.ints.get(), vec![1, 2]);
        assert_eq!(flags.int8.get(), 8);
        assert_eq!(flags.int64s.get(), vec![64]);
        assert_eq!(flags.uint.get(), 1);
        assert_eq!(flags.uint16.get(), 16);
        assert_eq!(flags.uint32s.get(), vec![32]);
        assert_eq!(flags.float32.get(), 3.5);
        assert_eq!(flags.float64s.get(), vec![6.25]);
        assert_eq!(flags.complex128.get(), Complex::new(1.0, 2.0));
        assert_eq!(flags.complex64s.get(), vec![Complex::new(0.0, 3.0)]);
        assert!(flags.bool.get());
        assert_eq!(flags.bools.get(), vec![false, true]);
        assert_eq!(flags.string.get(), "hi");
        assert_eq!(flags.strings.get(), vec!["a"]);
        assert_eq!(flags.duration.get(), Duration::from_secs(90));
        assert_eq!(flags.durations.get(), vec![Duration::from_secs(1)]);
        assert_eq!(flags.time.get().to_string(), "2021-06-15 00:00:00");
        assert_eq!(flags.times.get().len(), 1);
        assert_eq!(flags.url.get().path(), "/x");
        assert_eq!(flags.urls.get()[0].host_str(), Some("a.example"));
        assert!(flags.ip_addr.get().is_loopback());
        assert_eq!(flags.ip_addrs.get()[0].to_string(), "10.0.0.1");
        assert_eq!(flags.socket_addr.get().port(), 80);
        assert_eq!(flags.socket_addrs.get()[0].port(), 443);
        assert_eq!(set.n_flag(), 25);
    }

    #[test]
    fn file_mode_accumulates_permissions() {
        let mut set = FlagSet::default();
        let mode = set.add("mode", FileMode::new(0), "permissions");
        set.parse(["-mode", "rw"], &[]).unwrap();
        assert_eq!(mode.get(), READ | WRITE);
        assert_eq!(set.lookup("mode").unwrap().value(), "rw");
        assert!(!set.lookup("mode").unwrap().is_bool_flag());
    }

    #[test]
    fn file_mode_rejects_unknown_letters() {
        let mut set = FlagSet::default();
        set.add("mode", FileMode::new(0), "permissions");
        let err = set.parse(["-mode", "rx"], &[]).unwrap_err();
        assert!(err.to_string().contains("invalid file mode \"rx\""));
    }
}
