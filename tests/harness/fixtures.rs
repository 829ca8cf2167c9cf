/// A TPC-H flavoured read corpus, one statement per line.
pub const TPCH_READS: &str = "\
SELECT * FROM lineitem l JOIN orders o ON l.l_orderkey = o.o_orderkey
SELECT c_name FROM customer WHERE c_custkey = 7
SELECT n_name FROM nation JOIN region ON n_regionkey = r_regionkey
SELECT 1
";

/// Matching write corpus, semicolon-terminated and sharded.
pub const TPCH_WRITES: &str = "\
INSERT INTO \"orders_3\" VALUES (1, 2);
INSERT INTO lineitem_3 VALUES (1, 1);
DELETE FROM orders_1 WHERE o_orderkey = 1;
DELETE FROM lineitem WHERE l_orderkey = 1;
UPDATE customer SET c_acctbal = 0 WHERE c_custkey = 7;
VACUUM;
";

/// `n` identical reads of table `t`.
pub fn repeated_reads(n: usize) -> String {
    (0..n).map(|_| "SELECT * FROM t;\n").collect()
}

/// `n` writes of table `t`.
pub fn repeated_writes(n: usize) -> String {
    (0..n).map(|i| format!("UPDATE t SET v = {};\n", i)).collect()
}
